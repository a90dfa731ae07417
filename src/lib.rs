//! notepress - sync Notion database pages to static-site Markdown articles
//!
//! This crate provides the core functionality for the `notepress` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Resolved runtime settings and defaults
//! - [`model`] - Data types (DocumentRecord, Block, RichTextSpan)
//! - [`notion`] - Remote API client, retry policy, block tree loading
//! - [`render`] - Pure conversion to Markdown with YAML front matter
//! - [`sync`] - Manifest-backed idempotent file synchronization
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod notion;
pub mod render;
pub mod sync;

pub use error::{Error, Result};
