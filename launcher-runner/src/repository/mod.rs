//! Repository layer
//!
//! Repositories abstract communication with the metadata API. They provide
//! simple, focused lookups without any business logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod metadata;

// Re-export traits
pub use metadata::MetadataRepository;

// Re-export implementations
pub use metadata::HttpMetadataRepository;
