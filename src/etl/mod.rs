//! Core ETL abstractions
//!
//! Trait seams for turning source records into rows and for writing
//! batches of rows to a destination, plus the [`Pipeline`] that joins them.

mod load;
mod pipeline;
mod transform;

pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::Transformer;
