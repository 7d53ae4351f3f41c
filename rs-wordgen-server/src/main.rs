use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, put, web};

use rs_wordgen_core::io::{list_files, normalize_folder};
use rs_wordgen_core::model::prediction_input::DEFAULT_LENGTH;
use rs_wordgen_core::model::{Generator, MultiGramModel, StartSeed};
use serde::Deserialize;

const DATA_DIR: &str = "./data";
const CORPUS_EXTENSION: &str = "txt";
const DEFAULT_MAX_ORDER: usize = 3;
/// Upper bound on `length` for a single request.
const MAX_LENGTH: usize = 10_000;
/// Upper bound on `max_order` for training and generation requests.
const MAX_ORDER: usize = 16;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	length: Option<usize>,
	max_order: Option<usize>,
	seed: Option<String>, // none, random or custom:<prompt>
	rng_seed: Option<u64>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
	max_order: Option<usize>,
}

/// The current model is replaced as a whole, never mutated.
struct SharedData {
	data_dir: PathBuf,
	model: RwLock<Arc<MultiGramModel>>,
}

impl SharedData {
	fn current_model(&self) -> Result<Arc<MultiGramModel>, String> {
		match self.model.read() {
			Ok(model) => Ok(Arc::clone(&model)),
			Err(_) => Err("Model lock failed".to_owned()),
		}
	}
}

impl GenerateParams {
	/// Determines how the prompt is chosen.
	fn start_seed(&self) -> Result<StartSeed, String> {
		match &self.seed {
			None => Ok(StartSeed::False),
			Some(s) if s.to_lowercase() == "none" => Ok(StartSeed::False),
			Some(s) if s.to_lowercase() == "random" => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase().starts_with("custom:") => {
				let value = &s["custom:".len()..];
				if value.trim().is_empty() {
					Err("Custom seed cannot be empty".into())
				} else {
					Ok(StartSeed::Custom(value.to_owned()))
				}
			}
			Some(_) => Err("Seed must be 'none', 'random' or start with 'custom:'".into()),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates text from the current model based on query parameters.
/// Returns prompt and generated words, space separated.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let start_seed = match query.start_seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let length = query.length.unwrap_or(DEFAULT_LENGTH);
	if length > MAX_LENGTH {
		return HttpResponse::BadRequest().body(format!("length must be <= {MAX_LENGTH}"));
	}

	let model = match data.current_model() {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(e),
	};

	let mut input = model.make_prediction_input();
	if let Some(max_order) = query.max_order {
		if max_order > MAX_ORDER {
			return HttpResponse::BadRequest().body(format!("max_order must be <= {MAX_ORDER}"));
		}
		if let Err(e) = input.set_max_order(max_order) {
			return HttpResponse::BadRequest().body(e.to_string());
		}
	}
	input.length = length;
	input.start_seed = start_seed;
	input.seed = query.rng_seed;

	match Generator::new(&model, &input).and_then(Generator::predict) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => {
			log::error!("generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match corpus_names(&data.data_dir) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<SharedData>) -> impl Responder {
	match data.current_model() {
		Ok(model) => HttpResponse::Ok().body(model.get_corpus_names().join("\n")),
		Err(e) => HttpResponse::InternalServerError().body(e),
	}
}

/// HTTP PUT endpoint `/v1/load_corpora`
///
/// Trains a new model from the named corpora and swaps it in.
/// Requests already generating keep the previous model until they finish.
#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<SharedData>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let mut paths = Vec::new();
	for name in query_names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
		if name.contains(['/', '\\']) || name.contains("..") {
			return HttpResponse::BadRequest().body(format!("Invalid corpus name: {name}"));
		}
		paths.push(data.data_dir.join(format!("{name}.{CORPUS_EXTENSION}")));
	}

	let max_order = query.max_order.unwrap_or(DEFAULT_MAX_ORDER);
	if max_order > MAX_ORDER {
		return HttpResponse::BadRequest().body(format!("max_order must be <= {MAX_ORDER}"));
	}
	let model = match web::block(move || MultiGramModel::from_files(&paths, max_order)).await {
		Ok(Ok(m)) => m,
		Ok(Err(e)) => return HttpResponse::BadRequest().body(format!("Failed to load corpora: {e}")),
		Err(e) => return HttpResponse::InternalServerError().body(format!("Training task failed: {e}")),
	};

	match data.model.write() {
		Ok(mut current) => *current = Arc::new(model),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	}

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Corpus names (file stems) available in `dir`.
fn corpus_names(dir: &Path) -> io::Result<Vec<String>> {
	let suffix = format!(".{CORPUS_EXTENSION}");
	Ok(list_files(dir, CORPUS_EXTENSION)?
		.into_iter()
		.map(|file| file.strip_suffix(&suffix).unwrap_or(&file).to_owned())
		.collect())
}

/// Trains the startup model from every corpus in `dir`, or an empty one.
fn initial_model(dir: &Path) -> io::Result<MultiGramModel> {
	let paths: Vec<PathBuf> = match list_files(dir, CORPUS_EXTENSION) {
		Ok(files) => files.iter().map(|file| dir.join(file)).collect(),
		Err(e) => {
			log::warn!("cannot list {}: {e}", dir.display());
			Vec::new()
		}
	};

	let model = if paths.is_empty() {
		log::warn!("no corpus found in {}, starting with an empty model", dir.display());
		let words: [&str; 0] = [];
		MultiGramModel::build(&words, DEFAULT_MAX_ORDER)
	} else {
		MultiGramModel::from_files(&paths, DEFAULT_MAX_ORDER)
	};
	model.map_err(io::Error::other)
}

/// Main entry point for the server.
///
/// Trains the startup model, shares it read-only behind an `Arc`,
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Corpora are `.txt` files in `./data`, one document per line.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let data_dir = normalize_folder(DATA_DIR);
	let model = initial_model(&data_dir)?;
	let shared_data = web::Data::new(SharedData { data_dir, model: RwLock::new(Arc::new(model)) });

	log::info!("listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(put_corpora)
			.service(get_loaded_corpora)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
