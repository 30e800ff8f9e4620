mod error;
mod lookup;
mod partition;

#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use lookup::units_overlapping;
pub use partition::{partition, Segment};

/// 1-based page number within a document
pub type Page = u32;
