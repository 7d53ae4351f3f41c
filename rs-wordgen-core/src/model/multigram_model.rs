use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::distribution::Distribution;
use super::prediction_input::PredictionInput;
use crate::io::{get_filename, read_corpus};
use crate::{GenError, Result, Word};

/// Word n-gram model covering every order from 1 to `max_order`.
///
/// All orders share one lookup table keyed by context. A context of
/// length `k` belongs to order `k + 1`; keys of different lengths never
/// compare equal, so orders cannot collide.
///
/// The model is built once and only exposes shared references afterwards,
/// so any number of generators can read it concurrently.
///
/// # Invariants
/// - `max_order` is always >= 1
/// - Every key has length in `0..max_order`
/// - Every stored distribution is non-empty
/// - The empty context is present whenever the corpus had at least one word
#[derive(Clone, Debug)]
pub struct MultiGramModel {
	max_order: usize,
	word_count: usize,
	contexts: HashMap<Vec<Word>, Distribution>,
	corpus_names: Vec<String>,
}

impl MultiGramModel {
	/// Builds a model from a flat word sequence.
	///
	/// Single pass: at each position, every context of length
	/// `0..max_order` that ends right before it is credited with the word
	/// at that position. This yields the same counts as sliding one window
	/// of length `k + 1` per context length `k`.
	///
	/// # Errors
	/// Returns `GenError::InvalidConfig` if `max_order < 1`.
	pub fn build<S: AsRef<str>>(words: &[S], max_order: usize) -> Result<Self> {
		validate_max_order(max_order)?;

		let words: Vec<Word> = words.iter().map(|word| word.as_ref().to_owned()).collect();
		let mut contexts: HashMap<Vec<Word>, Distribution> = HashMap::new();

		for (i, continuation) in words.iter().enumerate() {
			// Contexts longer than the words seen so far do not exist yet
			for k in 0..max_order.min(i + 1) {
				let context = &words[i - k..i];
				if let Some(distribution) = contexts.get_mut(context) {
					distribution.observe(continuation);
				} else {
					contexts.entry(context.to_vec()).or_default().observe(continuation);
				}
			}
		}

		let model = Self { max_order, word_count: words.len(), contexts, corpus_names: Vec::new() };

		if log::log_enabled!(log::Level::Debug) {
			let mut per_order: BTreeMap<usize, usize> = BTreeMap::new();
			for context in model.contexts.keys() {
				*per_order.entry(context.len() + 1).or_default() += 1;
			}
			for (order, count) in per_order {
				log::debug!("order {}: {} contexts", order, count);
			}
		}
		log::info!(
			"built {}-gram model from {} words ({} contexts)",
			max_order,
			model.word_count,
			model.contexts.len()
		);

		Ok(model)
	}

	/// Reads corpus files (one document per line) and builds a single model.
	///
	/// Words of every file are concatenated in the given order. The file
	/// stems are kept as corpus names.
	///
	/// # Errors
	/// - `GenError::InvalidConfig` if `max_order < 1` or `paths` is empty,
	///   checked before any file is read.
	/// - `GenError::Io` if a file cannot be read.
	pub fn from_files<P: AsRef<Path>>(paths: &[P], max_order: usize) -> Result<Self> {
		validate_max_order(max_order)?;
		if paths.is_empty() {
			return Err(GenError::InvalidConfig("at least one corpus file is required".to_owned()));
		}

		let mut words = Vec::new();
		let mut corpus_names = Vec::with_capacity(paths.len());
		for path in paths {
			words.extend(read_corpus(path)?);
			corpus_names.push(get_filename(path)?);
		}

		let mut model = Self::build(&words, max_order)?;
		model.corpus_names = corpus_names;
		Ok(model)
	}

	/// Highest order the model was trained with.
	pub fn max_order(&self) -> usize {
		self.max_order
	}

	/// Number of training words.
	pub fn word_count(&self) -> usize {
		self.word_count
	}

	/// Number of distinct contexts, all orders included.
	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Returns the continuations observed after `context`, if any.
	///
	/// The context length selects the order: `&[]` is the unigram table.
	pub fn get(&self, context: &[Word]) -> Option<&Distribution> {
		self.contexts.get(context)
	}

	/// Iterates over every stored context of length `len`.
	pub fn contexts_of_len(&self, len: usize) -> impl Iterator<Item = (&[Word], &Distribution)> {
		self.contexts
			.iter()
			.filter(move |(context, _)| context.len() == len)
			.map(|(context, distribution)| (context.as_slice(), distribution))
	}

	/// Length of the longest stored context shorter than `bound`.
	///
	/// One scan over the contexts; `None` if the model is empty or `bound`
	/// is 0.
	pub fn longest_context_len(&self, bound: usize) -> Option<usize> {
		self.contexts.keys().map(Vec::len).filter(|len| *len < bound).max()
	}

	/// Names of the corpora the model was trained on (empty when built
	/// from an in-memory word sequence).
	pub fn get_corpus_names(&self) -> &[String] {
		&self.corpus_names
	}

	/// Returns a random observed context of length `len`.
	///
	/// Useful for starting a generation sequence. Candidates are sorted
	/// before drawing, so a seeded generator always picks the same one.
	/// Returns `None` if no context has this length.
	pub fn get_random_seed<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Option<&[Word]> {
		let mut candidates: Vec<&[Word]> = self.contexts_of_len(len).map(|(context, _)| context).collect();
		candidates.sort_unstable();
		candidates.choose(rng).copied()
	}

	/// Creates a `PredictionInput` defaulted to the trained order.
	pub fn make_prediction_input(&self) -> PredictionInput {
		PredictionInput::with_order(self.max_order)
	}
}

pub(crate) fn validate_max_order(max_order: usize) -> Result<()> {
	if max_order < 1 {
		return Err(GenError::InvalidConfig(format!("max_order must be >= 1, got {max_order}")));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn ctx(words: &[&str]) -> Vec<Word> {
		words.iter().map(|w| (*w).to_owned()).collect()
	}

	fn counts(distribution: &Distribution) -> Vec<(&str, u64)> {
		distribution.iter().collect()
	}

	#[test]
	fn build_counts_every_order() {
		let words = ["the", "cat", "sat", "the", "cat", "ran"];
		let model = MultiGramModel::build(&words, 2).unwrap();

		let unigram = model.get(&[]).unwrap();
		assert_eq!(counts(unigram), vec![("cat", 2), ("ran", 1), ("sat", 1), ("the", 2)]);
		assert_eq!(counts(model.get(&ctx(&["the"])).unwrap()), vec![("cat", 2)]);
		assert_eq!(counts(model.get(&ctx(&["cat"])).unwrap()), vec![("ran", 1), ("sat", 1)]);
		assert_eq!(counts(model.get(&ctx(&["sat"])).unwrap()), vec![("the", 1)]);
		assert!(model.get(&ctx(&["ran"])).is_none());
		assert_eq!(model.len(), 4);
		assert_eq!(model.word_count(), 6);
	}

	#[test]
	fn build_rejects_zero_order() {
		let err = MultiGramModel::build(&["a"], 0).unwrap_err();
		assert!(matches!(err, GenError::InvalidConfig(_)));
	}

	#[test]
	fn build_on_short_corpus_skips_missing_orders() {
		let model = MultiGramModel::build(&["alone"], 3).unwrap();
		assert_eq!(model.len(), 1);
		assert_eq!(model.get(&[]).unwrap().count("alone"), 1);
		assert_eq!(model.contexts_of_len(1).count(), 0);
		assert_eq!(model.contexts_of_len(2).count(), 0);
	}

	#[test]
	fn build_on_empty_corpus_is_empty() {
		let words: [&str; 0] = [];
		let model = MultiGramModel::build(&words, 3).unwrap();
		assert!(model.is_empty());
		assert!(model.get(&[]).is_none());
	}

	#[test]
	fn context_lengths_stay_below_max_order() {
		let words = "a b c a b d a b c a".split(' ').collect::<Vec<_>>();
		let model = MultiGramModel::build(&words, 3).unwrap();
		assert!(model.contexts.keys().all(|context| context.len() < 3));
		assert!(model.contexts.values().all(|distribution| !distribution.is_empty()));
	}

	#[test]
	fn totals_match_window_counts() {
		let words = "a b c a b d a b c a".split(' ').collect::<Vec<_>>();
		let model = MultiGramModel::build(&words, 3).unwrap();
		for k in 0..3 {
			let total: u64 = model.contexts_of_len(k).map(|(_, d)| d.total()).sum();
			assert_eq!(total as usize, words.len() - k);
		}
		assert_eq!(model.get(&ctx(&["a", "b"])).unwrap().total(), 3);
	}

	#[test]
	fn random_seed_is_an_observed_context() {
		let words = "a b c a b d".split(' ').collect::<Vec<_>>();
		let model = MultiGramModel::build(&words, 3).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let seed = model.get_random_seed(2, &mut rng).unwrap();
		assert_eq!(seed.len(), 2);
		assert!(model.get(seed).is_some());
		assert!(model.get_random_seed(3, &mut rng).is_none());
	}

	#[test]
	fn random_seed_is_reproducible() {
		let words = "a b c a b d e f g".split(' ').collect::<Vec<_>>();
		let model = MultiGramModel::build(&words, 2).unwrap();
		let pick = |seed| {
			let mut rng = StdRng::seed_from_u64(seed);
			model.get_random_seed(1, &mut rng).unwrap().to_vec()
		};
		assert_eq!(pick(9), pick(9));
	}

	#[test]
	fn huge_order_stores_only_observable_contexts() {
		let model = MultiGramModel::build(&["a", "b"], usize::MAX).unwrap();
		assert_eq!(model.len(), 2);
		assert_eq!(model.max_order(), usize::MAX);
		assert_eq!(model.longest_context_len(usize::MAX), Some(1));
	}

	#[test]
	fn longest_context_len_respects_bound() {
		let words = "a b c a b d".split(' ').collect::<Vec<_>>();
		let model = MultiGramModel::build(&words, 3).unwrap();
		assert_eq!(model.longest_context_len(3), Some(2));
		assert_eq!(model.longest_context_len(2), Some(1));
		assert_eq!(model.longest_context_len(0), None);
	}

	#[test]
	fn prediction_input_defaults_to_trained_order() {
		let model = MultiGramModel::build(&["a", "b"], 4).unwrap();
		assert_eq!(model.make_prediction_input().max_order(), 4);
	}
}
