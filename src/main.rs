mod charset;
mod grading;
mod models;
mod pipeline;
mod selector;
mod tables;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Grade a parallel Japanese/English corpus by JLPT kanji level and greedily
/// pick example sentences maximizing vocabulary coverage.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JLPT vocabulary table (TSV: kanji, hiragana, english, grade)
    #[arg(long, default_value = "data/JLPT_vocab.txt")]
    vocab: PathBuf,

    /// Parallel sentence corpus (TSV: japanese, english)
    #[arg(long, default_value = "data/parallel.ja-en")]
    sentences: PathBuf,

    /// Vocabulary to cover, one term per line
    /// (default: every vocabulary headword at the target level)
    #[arg(long)]
    target_vocab: Option<PathBuf>,

    /// Output TSV path
    #[arg(short, long, default_value = "out/selection.tsv")]
    output: PathBuf,

    /// Target JLPT level
    #[arg(short, long, default_value_t = 2)]
    level: u32,

    /// Number of sentences to select
    #[arg(short, long, default_value_t = 100)]
    count: usize,

    /// Exponent applied to sentence length when scoring; higher values
    /// penalize long sentences more strongly
    #[arg(long, default_value_t = 3.0)]
    length_penalty: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    info!("Starting jlpt-sentence-picker");

    // Friendlier errors than a bare "No such file" from deep in the pipeline
    for (name, path) in [("--vocab", &args.vocab), ("--sentences", &args.sentences)] {
        if !path.exists() {
            anyhow::bail!(
                "{} file not found at {}\n\
                 Expected a tab-separated table; see --help for the column layout.",
                name,
                path.display()
            );
        }
    }
    if let Some(ref path) = args.target_vocab {
        if !path.exists() {
            anyhow::bail!("--target-vocab file not found at {}", path.display());
        }
    }
    if let Some(dir) = args.output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    pipeline::run(&pipeline::PipelineArgs {
        vocab_path: &args.vocab,
        sentences_path: &args.sentences,
        target_vocab_path: args.target_vocab.as_deref(),
        output_path: &args.output,
        level: args.level,
        count: args.count,
        length_penalty: args.length_penalty,
    })
}
