use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use hanquiz::vocabulary::Word;
use hanquiz::vocabulary::merge::{Statistics, merge_into_csv};
use hanquiz::vocabulary::synth::generate_words;

#[derive(Parser)]
#[command(name = "generate_vocabulary", about = "Build and extend hanquiz vocabulary files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write synthetic practice words to a JSON file.
    Generate {
        #[arg(short = 'n', long, default_value_t = 1000)]
        count: usize,

        #[arg(short, long, default_value = "generated_words.json")]
        out: PathBuf,

        /// Fixed seed for a reproducible word list.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Append words from a JSON file to a vocabulary CSV, skipping known keys.
    Merge {
        #[arg(long)]
        json: PathBuf,

        #[arg(long, default_value = "assets/korean_vocabulary.csv")]
        csv: PathBuf,
    },
}

fn generate(count: usize, out: &PathBuf, seed: Option<u64>) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let words = generate_words(count, &mut rng);
    if words.len() < count {
        log::warn!("only {} unique words generated of {count} requested", words.len());
    }

    let json = serde_json::to_string_pretty(&words)?;
    fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;

    println!("Wrote {} words to {}", words.len(), out.display());
    println!("{}", Statistics::from_words(&words));
    Ok(())
}

fn merge(json: &PathBuf, csv: &PathBuf) -> Result<()> {
    let content = fs::read_to_string(json).with_context(|| format!("reading {}", json.display()))?;
    let words: Vec<Word> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", json.display()))?;

    let report = merge_into_csv(csv, &words).with_context(|| format!("merging into {}", csv.display()))?;

    println!("Existing words: {}", report.existing);
    println!("Added:          {}", report.added);
    println!("Skipped:        {}", report.skipped);
    println!();
    println!("{}", report.statistics);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Generate { count, out, seed } => generate(count, &out, seed),
        Command::Merge { json, csv } => merge(&json, &csv),
    }
}
