//! Shared test utilities for the media-archive-mirror workspace.
//!
//! This crate provides standardised fixtures for engine and CLI tests. It is
//! a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`tree`]: [`MediaTree`] builder for a temporary source/target pair
//! - [`archive`]: helpers for inspecting produced `tar.gz` files

pub mod archive;
pub mod tree;

pub use tree::MediaTree;
