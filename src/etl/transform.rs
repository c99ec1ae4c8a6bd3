//! Transformer trait for record conversion

/// Transformer trait for converting source items
///
/// Implementors define how one item becomes another:
/// - Column projection
/// - Missing-value normalization
/// - Scalar typing
///
/// # Example
/// ```
/// use rawload::etl::Transformer;
/// use std::convert::Infallible;
///
/// struct Trim;
///
/// impl Transformer for Trim {
///     type Input = String;
///     type Output = String;
///     type Error = Infallible;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
///         Ok(input.trim().to_string())
///     }
/// }
///
/// let out = Trim.transform_many(vec![" a ".to_string()]).unwrap();
/// assert_eq!(out, vec!["a".to_string()]);
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Failure type; use [`std::convert::Infallible`] for total conversions
    type Error: std::error::Error + Send + Sync + 'static;

    /// Transform a single item
    fn transform(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Transform multiple items, preserving order
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>, Self::Error> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct Double;

    impl Transformer for Double {
        type Input = i32;
        type Output = i32;
        type Error = Infallible;

        fn transform(&self, input: Self::Input) -> Result<Self::Output, Self::Error> {
            Ok(input * 2)
        }
    }

    #[test]
    fn test_transform_many_preserves_order() {
        let output = Double.transform_many(vec![3, 1, 2]).unwrap();
        assert_eq!(output, vec![6, 2, 4]);
    }
}
