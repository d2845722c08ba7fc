//! Artifact packer library.
//!
//! Packages directory trees into a zip or tar.gz archive that embeds a
//! generated provenance manifest and a deterministic content hash, and
//! validates unpacked archives against that hash. The hash is stable
//! across host OS and filesystem enumeration order, so the same inputs
//! always produce the same artifact name and manifest.
//!
//! # Modules
//!
//! - [`archive`] - Zip and tar.gz archive assembly
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Immutable build configuration record
//! - [`digest`] - Truncated SHA-1 content digest newtype
//! - [`error`] - Semantic error types
//! - [`filter`] - Inclusion rules shared by hashing and archiving
//! - [`hasher`] - Deterministic content hashing
//! - [`manifest`] - Provenance manifest rendering and lookup
//! - [`metadata`] - Default provenance metadata lookups
//! - [`naming`] - Artifact naming policy
//! - [`pipeline`] - Build orchestration
//! - [`validate`] - Unpacked-archive validation
//! - [`walk`] - Canonical directory traversal

pub mod archive;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod filter;
pub mod hasher;
pub mod manifest;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod validate;
pub mod walk;
