use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use crate::{Result, Word};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Splits a document into case-folded words.
///
/// Punctuation stays attached to the word it touches.
pub fn tokenize(text: &str) -> impl Iterator<Item = Word> + '_ {
	text.split_whitespace().map(str::to_lowercase)
}

/// Reads a corpus file (one document per line) into a flat word sequence.
///
/// Documents are concatenated in file order; no boundary marker is inserted.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> Result<Vec<Word>> {
	let filename = filename.as_ref();
	let lines = read_file(filename)?;
	let words: Vec<Word> = lines.iter().flat_map(|line| tokenize(line)).collect();
	log::debug!("read {} documents, {} words from {}", lines.len(), words.len(), filename.display());
	Ok(words)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/tweets.txt"` → `"tweets"`
/// - `"tweets.txt"` → `"tweets"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
