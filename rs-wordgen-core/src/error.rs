use thiserror::Error;

use crate::Word;

/// Errors raised while building a model or generating from it.
#[derive(Debug, Error)]
pub enum GenError {
	/// Sampling was attempted on a distribution with no entries.
	///
	/// Stored distributions are never empty, so this signals a bug.
	#[error("cannot sample from an empty distribution")]
	EmptyDistribution,

	/// No order, down to the empty context, matched the current history.
	///
	/// Only reachable with a model trained on an empty corpus.
	#[error("no continuation for history ending in {context:?} (orders {max_order} down to 1 tried)")]
	NoContinuation { context: Vec<Word>, max_order: usize },

	/// A parameter was rejected before any work was done.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("failed to parse configuration: {0}")]
	ConfigFormat(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
