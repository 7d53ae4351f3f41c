use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::multigram_model::validate_max_order;
use crate::model::{PredictionInput, StartSeed};
use crate::{GenError, Result};

/// Settings of one train-then-generate run, read from a `TOML` file.
///
/// Every field is optional in the file:
///
/// ```toml
/// corpus = ["tweets.txt"]
/// max_order = 3
/// length = 1000
/// prompt = "covid is"
/// seed = 42
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Corpus files, one document per line.
	pub corpus: Vec<PathBuf>,
	pub max_order: usize,
	/// Words generated after the prompt.
	pub length: usize,
	/// `None`, or `prompt = ""` in a file, generates from the
	/// unconditional context.
	pub prompt: Option<String>,
	pub seed: Option<u64>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			corpus: vec![PathBuf::from("./data/tweets.txt")],
			max_order: 3,
			length: 1000,
			prompt: Some("covid is".to_owned()),
			seed: None,
		}
	}
}

impl Config {
	/// Loads and validates a configuration file.
	///
	/// Relative corpus paths are resolved against the file's directory.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let contents = fs::read_to_string(path)?;
		let mut config: Config = toml::from_str(&contents)?;

		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
		for corpus in &mut config.corpus {
			if corpus.is_relative() {
				*corpus = base_dir.join(&*corpus);
			}
		}

		config.validate()?;
		log::debug!("loaded configuration from {}: {:?}", path.display(), config);
		Ok(config)
	}

	/// Checks every field and reports all problems at once.
	pub fn validate(&self) -> Result<()> {
		let mut errors = Vec::new();

		if let Err(GenError::InvalidConfig(message)) = validate_max_order(self.max_order) {
			errors.push(message);
		}
		if self.corpus.is_empty() {
			errors.push("corpus must list at least one file".to_owned());
		}

		if errors.is_empty() {
			Ok(())
		} else {
			Err(GenError::InvalidConfig(errors.join("; ")))
		}
	}

	/// Builds the generation parameters described by this configuration.
	pub fn prediction_input(&self) -> Result<PredictionInput> {
		let mut input = PredictionInput::new(self.max_order)?;
		input.length = self.length;
		input.seed = self.seed;
		input.start_seed = match &self.prompt {
			Some(prompt) if !prompt.trim().is_empty() => StartSeed::Custom(prompt.clone()),
			_ => StartSeed::False,
		};
		Ok(input)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_file_gives_defaults() {
		let config: Config = toml::from_str("").unwrap();
		assert_eq!(config.max_order, 3);
		assert_eq!(config.length, 1000);
		assert_eq!(config.prompt.as_deref(), Some("covid is"));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn validate_collects_every_problem() {
		let config: Config = toml::from_str("max_order = 0\ncorpus = []").unwrap();
		match config.validate() {
			Err(GenError::InvalidConfig(message)) => {
				assert!(message.contains("max_order"));
				assert!(message.contains("corpus"));
			}
			other => panic!("unexpected result {other:?}"),
		}
	}

	#[test]
	fn negative_length_is_a_parse_error() {
		assert!(toml::from_str::<Config>("length = -1").is_err());
	}

	#[test]
	fn unknown_field_is_rejected() {
		assert!(toml::from_str::<Config>("smoothing = true").is_err());
	}

	#[test]
	fn from_path_resolves_corpus_against_file() {
		let dir = std::env::temp_dir().join(format!("rs-wordgen-config-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		let path = dir.join("wordgen.toml");
		fs::write(&path, "corpus = [\"tweets.txt\"]\nmax_order = 2\nseed = 4\n").unwrap();

		let config = Config::from_path(&path).unwrap();
		assert_eq!(config.corpus, vec![dir.join("tweets.txt")]);
		assert_eq!(config.seed, Some(4));

		fs::remove_dir_all(dir).unwrap();
	}

	#[test]
	fn empty_prompt_in_file_means_no_prompt() {
		let config: Config = toml::from_str("prompt = \"\"").unwrap();
		assert_eq!(config.prediction_input().unwrap().start_seed, StartSeed::False);

		let config: Config = toml::from_str("prompt = \"  \"").unwrap();
		assert_eq!(config.prediction_input().unwrap().start_seed, StartSeed::False);

		let config: Config = toml::from_str("prompt = \"Covid is\"").unwrap();
		assert_eq!(config.prediction_input().unwrap().start_seed, StartSeed::Custom("Covid is".to_owned()));
	}

	#[test]
	fn prediction_input_carries_prompt_and_seed() {
		let config = Config { prompt: None, seed: Some(1), length: 5, ..Config::default() };
		let input = config.prediction_input().unwrap();
		assert_eq!(input.start_seed, StartSeed::False);
		assert_eq!(input.seed, Some(1));
		assert_eq!(input.length, 5);
		assert_eq!(input.max_order(), 3);
	}
}
