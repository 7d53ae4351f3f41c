//! Word-level n-gram text generation library.
//!
//! This crate provides a word n-gram generation system including:
//! - Corpus tokenization (case folding, whitespace splitting)
//! - A multi-order model mapping every observed context to its continuations
//! - Longest-context-first generation with back-off down to the empty context
//! - Configuration and error types shared by the binaries
//!
//! Training and generation are two strictly sequential phases: a
//! `MultiGramModel` is built once, then any number of `Generator`s read it.

/// Core n-gram model and generation logic.
pub mod model;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// File-based configuration (`TOML`).
pub mod config;

/// I/O utilities (corpus loading, tokenization, path helpers).
pub mod io;

pub use error::{GenError, Result};

/// A normalized (case-folded) token.
pub type Word = String;
