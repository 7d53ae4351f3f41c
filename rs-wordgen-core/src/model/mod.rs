//! Top-level module for the n-gram generation system.
//!
//! - Combined multi-order model (`MultiGramModel`)
//! - Per-context continuation counts (`Distribution`)
//! - Generation parameters (`PredictionInput`, `StartSeed`)
//! - A lazy, back-off generator (`Generator`)

/// Longest-context-first generation over a trained model.
pub mod generator;

/// Multi-order word n-gram model built in a single pass over a corpus.
pub mod multigram_model;

/// Continuation counts of one context and weighted random sampling.
pub mod distribution;

/// Parameters of one generation run (order, length, prompt, seed).
pub mod prediction_input;

pub use distribution::Distribution;
pub use generator::{Generator, generate};
pub use multigram_model::MultiGramModel;
pub use prediction_input::{PredictionInput, StartSeed};
