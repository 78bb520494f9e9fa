//! Synclang - keep localized JSON message files in sync
//!
//! One locale is authoritative. Synclang diffs its files against the last
//! committed version, sends only added, changed and missing keys to an AI
//! translation backend in small batches, and writes every other locale back
//! in the authoritative file's key order.
//!
//! ## Module Structure
//!
//! - `backend`: HTTP translation backends (OpenAI, Anthropic)
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Diffing and reconciliation engine

pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
