use std::collections::BTreeMap;

use rand::Rng;

use crate::{GenError, Result, Word};

/// Observed continuations of a single context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations. Counts are kept raw;
/// sampling treats them as unnormalized weights.
///
/// ## Invariants
/// - Each continuation count is strictly positive
/// - A distribution stored in a model has at least one continuation
///
/// Continuations are ordered so that a seeded generator always draws the
/// same sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
	/// Example: { "cat" => 42, "dog" => 3 }
	counts: BTreeMap<Word, u64>,
	/// Sum of all counts.
	total: u64,
}

impl Distribution {
	/// Records one occurrence of `word` following this context.
	pub(crate) fn observe(&mut self, word: &str) {
		match self.counts.get_mut(word) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(word.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	/// Number of times `word` was observed as a continuation.
	pub fn count(&self, word: &str) -> u64 {
		self.counts.get(word).copied().unwrap_or(0)
	}

	/// Number of times the context was observed followed by any word.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Number of distinct continuations.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(continuation, count)` pairs in word order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(word, count)| (word.as_str(), *count))
	}

	/// Draws one continuation with probability proportional to its count.
	///
	/// Performs an O(n) scan with cumulative subtraction over a uniform
	/// draw in `0..total`. No state is carried between calls.
	///
	/// # Errors
	/// Returns `GenError::EmptyDistribution` if there is nothing to draw from.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
		if self.total == 0 {
			return Err(GenError::EmptyDistribution);
		}

		let mut r = rng.random_range(0..self.total);
		for (word, count) in &self.counts {
			if r < *count {
				return Ok(word.as_str());
			}
			r -= count;
		}

		// `total` is the exact sum of the counts
		Err(GenError::EmptyDistribution)
	}
}

impl<S: AsRef<str>> FromIterator<S> for Distribution {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut distribution = Self::default();
		for word in iter {
			distribution.observe(word.as_ref());
		}
		distribution
	}
}
