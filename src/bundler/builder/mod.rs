//! Build orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that sequences the
//! pipeline steps and reports what they produced.
//!
//! # Overview
//!
//! The bundler:
//! 1. Checks the platform and configuration before running anything
//! 2. Compiles (or reuses) the distribution tree
//! 3. Finalizes the compiler output under the application name
//! 4. Delegates packaging to the platform module
//! 5. Writes the update archive
//! 6. Measures and hashes every artifact into a [`BuildReport`]
//!
//! # Module Organization
//!
//! - `artifact` - [`BundledArtifact`] and [`BuildReport`]
//! - `checksum` - SHA256 checksum calculation for artifacts
//! - `orchestrator` - Main [`Bundler`] struct
//! - `state` - [`BuildState`] machine and [`BuildStep`]

mod artifact;
mod checksum;
mod orchestrator;
mod state;

pub use artifact::{ArtifactKind, BuildReport, BundledArtifact};
pub use orchestrator::Bundler;
pub use state::{BuildState, BuildStep};
