use rand::Rng;

use super::multigram_model::{MultiGramModel, validate_max_order};
use crate::io::tokenize;
use crate::{Result, Word};

/// Number of words generated when nothing else is requested.
pub const DEFAULT_LENGTH: usize = 1000;

/// Strategy used to select the prompt when generating a sequence.
///
/// # Variants
/// - `Random`: start from a random observed context of length
///   `max_order - 1`, or shorter if the model has none that long.
/// - `Custom(String)`: tokenize the provided text and use it as the prompt.
/// - `False`: no prompt; generation starts from the unconditional context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartSeed {
	Random,
	Custom(String),
	False,
}

/// Parameters of one generation run.
///
/// # Invariants
/// - `max_order` is always >= 1
#[derive(Clone, Debug)]
pub struct PredictionInput {
	/// Longest order tried at each step.
	max_order: usize,

	/// Number of words appended after the prompt.
	pub length: usize,

	/// How the prompt is chosen.
	pub start_seed: StartSeed,

	/// Seed for the random generator; `None` draws one from the OS.
	pub seed: Option<u64>,
}

impl PredictionInput {
	/// Creates a `PredictionInput` with the given order and default settings.
	///
	/// # Errors
	/// Returns an error if `max_order < 1`.
	pub fn new(max_order: usize) -> Result<Self> {
		validate_max_order(max_order)?;
		Ok(Self::with_order(max_order))
	}

	/// Callers guarantee `max_order >= 1`.
	pub(crate) fn with_order(max_order: usize) -> Self {
		debug_assert!(max_order >= 1);
		Self { max_order, length: DEFAULT_LENGTH, start_seed: StartSeed::False, seed: None }
	}

	pub fn max_order(&self) -> usize {
		self.max_order
	}

	/// Sets the longest order tried at each step.
	///
	/// # Errors
	/// Returns an error if `max_order < 1`; the previous value is kept.
	pub fn set_max_order(&mut self, max_order: usize) -> Result<()> {
		validate_max_order(max_order)?;
		self.max_order = max_order;
		Ok(())
	}

	/// Turns the start seed into prompt words.
	pub(crate) fn resolve_prompt<R: Rng + ?Sized>(&self, model: &MultiGramModel, rng: &mut R) -> Vec<Word> {
		match &self.start_seed {
			StartSeed::False => Vec::new(),
			StartSeed::Custom(text) => tokenize(text).collect(),
			StartSeed::Random => model
				.longest_context_len(self.max_order)
				.filter(|len| *len > 0)
				.and_then(|len| model.get_random_seed(len, rng))
				.map(<[Word]>::to_vec)
				.unwrap_or_default(),
		}
	}
}
