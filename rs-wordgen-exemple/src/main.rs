use std::env;

use rs_wordgen_core::config::Config;
use rs_wordgen_core::model::{Generator, MultiGramModel, StartSeed};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The first argument is an optional TOML configuration file,
    // otherwise the corpus is read from "./data/tweets.txt"
    let config = match env::args().nth(1) {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    // Train once: every order from 1 to 'max_order' lands in the same model
    let model = MultiGramModel::from_files(&config.corpus, config.max_order)?;
    log::info!("corpora: {}", model.get_corpus_names().join(", "));

    // Generation parameters from the configuration
    let mut input = config.prediction_input()?;

    // An order of 0 is rejected and the previous value is kept
    match input.set_max_order(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("max_order 0 rejected: {e}"),
    }

    // Prompt given by the configuration
    if let StartSeed::Custom(prompt) = &input.start_seed {
        println!("{prompt} (prompt)");
    }
    println!("{}", Generator::new(&model, &input)?.predict()?);

    // A few short runs starting from a random observed context
    input.start_seed = StartSeed::Random;
    input.length = 20;
    for i in 0..5 {
        input.seed = config.seed.map(|seed| seed.wrapping_add(i));
        println!("Generated text {}: {}", i + 1, Generator::new(&model, &input)?.predict()?);
    }

    // Lazy generation, one word at a time
    input.start_seed = StartSeed::False;
    input.length = 10;
    let words: Vec<String> = Generator::new(&model, &input)?.collect::<Result<_, _>>()?;
    println!("Unprompted: {}", words.join(" "));

    Ok(())
}
