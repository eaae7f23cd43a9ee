//! Shared test utilities for the project settings workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`project`]: [`project::TestProject`] builder for a temporary project root

pub mod project;

pub use project::{FileSnapshot, TestProject};
