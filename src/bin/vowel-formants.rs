//! vowel-formants - Extract vowel formants from annotated speech recordings.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vowel_formants::{
    discover_pairs, CorpusSplit, DatasetWriter, ExtractionConfig, FormantExtractor, LinePolicy,
    Monophthong,
};

/// Extract vowel formants from annotated speech recordings.
#[derive(Parser)]
#[command(name = "vowel-formants")]
#[command(about = "Per-vowel spectral formant extraction")]
#[command(version)]
struct Cli {
    /// Config file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads (0 = one per CPU)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Abort a file on its first malformed annotation line
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract formants from one recording
    Extract(ExtractArgs),
    /// Extract a whole TIMIT-style corpus into dataset CSVs
    Batch(BatchArgs),
    /// Print the vowel table
    Vowels,
}

#[derive(Args)]
struct ExtractArgs {
    /// Audio file
    #[arg(long)]
    audio: PathBuf,

    /// Phoneme annotation file (.PHN)
    #[arg(long)]
    annotation: PathBuf,

    /// Print one JSON object per record
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Corpus root containing TRAIN/ and TEST/
    #[arg(long)]
    data_dir: PathBuf,

    /// Directory for train_formants.csv and test_formants.csv
    #[arg(short = 'o', long)]
    out_dir: PathBuf,

    /// Maximum files per split
    #[arg(long)]
    limit: Option<usize>,

    /// Extension of the audio files
    #[arg(long, default_value = "wav")]
    audio_ext: String,

    /// Only process the TRAIN split
    #[arg(long, conflicts_with = "test")]
    train: bool,

    /// Only process the TEST split
    #[arg(long)]
    test: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Extract(args) => run_extract(&cli, args),
        Commands::Batch(args) => run_batch(&cli, args),
        Commands::Vowels => {
            print_vowels();
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut config = match &cli.config {
        Some(path) => ExtractionConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExtractionConfig::default(),
    };
    if let Some(threads) = cli.threads {
        config.num_threads = threads;
    }
    if cli.strict {
        config.line_policy = LinePolicy::Fail;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_extract(cli: &Cli, args: &ExtractArgs) -> Result<()> {
    let extractor = FormantExtractor::new(load_config(cli)?)?;
    let extraction = extractor
        .extract_file(&args.audio, &args.annotation)
        .with_context(|| format!("failed to extract {}", args.audio.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &extraction.records {
        if args.json {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        } else {
            let formants: Vec<String> = record.formants.iter().map(|f| f.to_string()).collect();
            writeln!(out, "{}\t{}", record.phoneme, formants.join(" "))?;
        }
    }

    for failure in &extraction.failures {
        warn!(
            index = failure.index,
            symbol = failure.occurrence.symbol(),
            "no formants: {}",
            failure.error
        );
    }
    Ok(())
}

fn run_batch(cli: &Cli, args: &BatchArgs) -> Result<()> {
    let splits: Vec<CorpusSplit> = match (args.train, args.test) {
        (true, false) => vec![CorpusSplit::Train],
        (false, true) => vec![CorpusSplit::Test],
        _ => vec![CorpusSplit::Train, CorpusSplit::Test],
    };

    let extractor = FormantExtractor::new(load_config(cli)?)?;
    let pairs = discover_pairs(&args.data_dir, &args.audio_ext, &splits, args.limit)
        .with_context(|| format!("failed to scan {}", args.data_dir.display()))?;
    info!(files = pairs.len(), "starting batch");

    let mut writer = DatasetWriter::new(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut failed_files = 0;
    let mut failed_occurrences = 0;
    for item in extractor.extract_batch(&pairs) {
        match item.result {
            Ok(extraction) => {
                failed_occurrences += extraction.failures.len();
                writer.write_records(item.pair.split, &extraction.records)?;
            }
            Err(err) => {
                failed_files += 1;
                eprintln!("{}: {}", item.pair.annotation.display(), err);
            }
        }
    }

    let rows = writer.finish()?;
    info!(
        files = pairs.len(),
        failed_files,
        failed_occurrences,
        rows,
        out_dir = %args.out_dir.display(),
        "batch finished"
    );
    Ok(())
}

fn print_vowels() {
    println!("{:<6}{:<8}{}", "class", "arpabet", "ipa");
    for vowel in Monophthong::ALL {
        println!("{:<6}{:<8}{}", vowel.class_index(), vowel.arpabet(), vowel.ipa());
    }
}
