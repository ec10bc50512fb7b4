//! Resolved metadata: declarations merged across class hierarchies.

mod class;
mod loader;
mod resolver;

pub use class::{ClassMetadata, PropertyMetadata};
pub use loader::MetadataLoader;
pub use resolver::MetadataResolver;
