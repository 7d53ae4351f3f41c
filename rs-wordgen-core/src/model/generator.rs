use std::iter::FusedIterator;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::distribution::Distribution;
use super::multigram_model::{MultiGramModel, validate_max_order};
use super::prediction_input::PredictionInput;
use crate::{GenError, Result, Word};

/// Lazy word generator reading a trained `MultiGramModel`.
///
/// Each step resolves the longest context available for the current
/// history, from `max_order` down to the empty context, samples one word
/// from it and appends it. Orders are never blended.
///
/// The iterator yields exactly `length` words, or stops right after the
/// first error.
#[derive(Debug)]
pub struct Generator<'a, R = StdRng> {
	model: &'a MultiGramModel,
	max_order: usize,
	history: Vec<Word>,
	remaining: usize,
	rng: R,
	failed: bool,
}

impl<'a> Generator<'a, StdRng> {
	/// Creates a generator from a `PredictionInput`.
	///
	/// The random generator is seeded from `prediction_input.seed`, or from
	/// the OS when no seed is given. The prompt is resolved from the start
	/// seed with the same generator.
	pub fn new(model: &'a MultiGramModel, prediction_input: &PredictionInput) -> Result<Self> {
		let mut rng = match prediction_input.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		let prompt = prediction_input.resolve_prompt(model, &mut rng);
		Self::with_rng(model, prompt, prediction_input.max_order(), prediction_input.length, rng)
	}
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a generator with an explicit prompt and random source.
	///
	/// # Errors
	/// Returns `GenError::InvalidConfig` if `max_order < 1`.
	pub fn with_rng(model: &'a MultiGramModel, prompt: Vec<Word>, max_order: usize, length: usize, rng: R) -> Result<Self> {
		validate_max_order(max_order)?;
		if max_order > model.max_order() {
			log::warn!(
				"generating with max_order {} from a model trained up to order {}; longer contexts will never match",
				max_order,
				model.max_order()
			);
		}

		Ok(Self { model, max_order, history: prompt, remaining: length, rng, failed: false })
	}

	/// Prompt followed by every word generated so far.
	pub fn history(&self) -> &[Word] {
		&self.history
	}

	/// Words still to be generated.
	pub fn remaining(&self) -> usize {
		self.remaining
	}

	/// Generates every remaining word and returns the full history.
	///
	/// # Errors
	/// Aborts on the first step without any matching context.
	pub fn run(mut self) -> Result<Vec<Word>> {
		while self.remaining > 0 {
			self.advance()?;
		}
		Ok(self.history)
	}

	/// Same as `run`, joined with single spaces.
	pub fn predict(self) -> Result<String> {
		Ok(self.run()?.join(" "))
	}

	/// Performs one generation step.
	fn advance(&mut self) -> Result<Word> {
		let word = self.resolve()?.sample(&mut self.rng)?.to_owned();
		self.history.push(word.clone());
		self.remaining -= 1;
		Ok(word)
	}

	/// Finds the distribution of the longest observed context ending the history.
	fn resolve(&self) -> Result<&'a Distribution> {
		let model = self.model;
		let len = self.history.len();
		// Orders above the trained one or needing more words than the history holds never match
		let longest = self.max_order.min(model.max_order()).min(len + 1);

		for order in (1..=longest).rev() {
			let k = order - 1;
			if let Some(distribution) = model.get(&self.history[len - k..]) {
				log::trace!("step {}: order {} matched", len, order);
				return Ok(distribution);
			}
		}

		let tail = len.min(self.max_order - 1);
		Err(GenError::NoContinuation { context: self.history[len - tail..].to_vec(), max_order: self.max_order })
	}
}

impl<R: Rng> Iterator for Generator<'_, R> {
	type Item = Result<Word>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed || self.remaining == 0 {
			return None;
		}
		let step = self.advance();
		self.failed = step.is_err();
		Some(step)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		if self.failed { (0, Some(0)) } else { (0, Some(self.remaining)) }
	}
}

impl<R: Rng> FusedIterator for Generator<'_, R> {}

/// Generates `length` words after `prompt` and returns prompt and
/// generated words in order.
///
/// # Errors
/// - `GenError::InvalidConfig` if `max_order < 1`.
/// - `GenError::NoContinuation` if a step finds no context at all.
pub fn generate<S, R>(prompt: &[S], model: &MultiGramModel, max_order: usize, length: usize, rng: &mut R) -> Result<Vec<Word>>
where
	S: AsRef<str>,
	R: Rng + ?Sized,
{
	let prompt = prompt.iter().map(|word| word.as_ref().to_owned()).collect();
	Generator::with_rng(model, prompt, max_order, length, rng)?.run()
}
