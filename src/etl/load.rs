//! Loader trait for writing batches to a destination

use std::future::Future;

/// Loader trait for writing one batch of items to a destination
///
/// Each call is one unit of work; implementors decide what "committed" means.
///
/// # Example
/// ```no_run
/// use rawload::etl::Loader;
/// use std::convert::Infallible;
///
/// struct CountingLoader(u64);
///
/// impl Loader for CountingLoader {
///     type Item = String;
///     type Error = Infallible;
///
///     async fn load(&mut self, items: &[Self::Item]) -> Result<u64, Self::Error> {
///         self.0 += items.len() as u64;
///         Ok(items.len() as u64)
///     }
/// }
/// ```
pub trait Loader: Send {
    /// The type of items to load
    type Item: Send + Sync;

    /// Failure type reported for a rejected batch
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load one batch to the destination
    ///
    /// Returns the number of items the destination actually accepted
    fn load(
        &mut self,
        items: &[Self::Item],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
