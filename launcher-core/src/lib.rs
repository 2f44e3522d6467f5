//! Launcher Core
//!
//! Core types and abstractions for the build launcher.
//!
//! This crate contains:
//! - Domain types: records fetched from the metadata API (Build, Job, Pipeline)
//! - SCM: parsing of source-control locators into structured coordinates

pub mod domain;
pub mod scm;
