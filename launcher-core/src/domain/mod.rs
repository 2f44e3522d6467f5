//! Core domain types
//!
//! Records returned by the metadata API. Each one references its parent by ID:
//! a build points at a job, a job points at a pipeline, and the pipeline carries
//! the SCM locator of the repository to check out.

pub mod build;
pub mod job;
pub mod pipeline;
