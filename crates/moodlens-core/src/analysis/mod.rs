//! Batch analysis of a session's images

mod batch;
mod observer;
mod source;

#[cfg(test)]
mod tests;

pub use batch::{BatchRun, BatchRunner, ItemFailure, PersistenceHandle, PersistenceOutcome};
pub use observer::{LoggingObserver, PersistenceObserver};
pub use source::{FsImageSource, ImageSource};
