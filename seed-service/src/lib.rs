pub mod pipeline;
pub mod config;
pub mod estimate;
pub mod generators;
pub mod sources;
pub mod sinks;
pub mod transform;
pub mod observability;

pub use pipeline::{Pipeline, Envelope};
