//! Per-load progress reporting

/// Result of one committed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub index: usize,
    /// Source row offset of the first row in the batch
    pub offset: usize,
    /// Rows submitted in the statement
    pub rows: usize,
    /// Rows actually inserted (duplicates excluded)
    pub affected: u64,
}

impl BatchOutcome {
    pub fn ignored(&self) -> u64 {
        (self.rows as u64).saturating_sub(self.affected)
    }
}

/// Summary of a completed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub batches: Vec<BatchOutcome>,
}

impl LoadReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            batches: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, outcome: BatchOutcome) {
        self.batches.push(outcome);
    }

    /// Rows submitted across all committed batches
    pub fn rows_read(&self) -> usize {
        self.batches.iter().map(|b| b.rows).sum()
    }

    pub fn rows_affected(&self) -> u64 {
        self.batches.iter().map(|b| b.affected).sum()
    }

    /// Rows skipped by the destination as duplicates
    pub fn rows_ignored(&self) -> u64 {
        self.batches.iter().map(BatchOutcome::ignored).sum()
    }

    pub fn committed_batches(&self) -> usize {
        self.batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut report = LoadReport::new("customers_raw");
        report.record(BatchOutcome {
            index: 0,
            offset: 0,
            rows: 1000,
            affected: 990,
        });
        report.record(BatchOutcome {
            index: 1,
            offset: 1000,
            rows: 12,
            affected: 12,
        });

        assert_eq!(report.rows_read(), 1012);
        assert_eq!(report.rows_affected(), 1002);
        assert_eq!(report.rows_ignored(), 10);
        assert_eq!(report.committed_batches(), 2);
    }
}
