//! Command-line entry point: run the engine on a JSON bundle.

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use author_disambiguation::report::{write_analysis, write_features, write_term_matrix};
use author_disambiguation::sources::InMemoryStore;
use author_disambiguation::{Engine, EngineConfig, EngineParameters, Result};

#[derive(Debug, Parser)]
#[command(name = "disambiguate", version, about = "Attribute candidate articles to an author identity")]
struct Cli {
    /// JSON run bundle with identities, articles and gold standard
    #[arg(short, long)]
    input: PathBuf,

    /// TOML engine configuration; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run this identity; all identities in the bundle otherwise
    #[arg(long)]
    identity: Option<String>,

    /// Directory for the feature CSV of each identity
    #[arg(long)]
    features_csv: Option<PathBuf>,

    /// Directory for the analysis CSV of each identity
    #[arg(long)]
    analysis_csv: Option<PathBuf>,

    /// Directory for the term-presence matrix CSV of each identity
    #[arg(long)]
    term_matrix: Option<PathBuf>,

    /// Directory for the CBOR snapshot of each run
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("author_disambiguation=info,warn")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config)?;
    let store = InMemoryStore::load(&cli.input)?;

    let identities = match &cli.identity {
        Some(key) => vec![store.identity(key)?.clone()],
        None => store.identities().to_vec(),
    };

    for identity in identities {
        let key = identity.key.clone();
        let params =
            EngineParameters::gather(&store, identity, store.global_mesh_counts().cloned())?;
        let output = engine.run(&params)?;

        println!(
            "{}\tselected={}\tprecision={:.3}\trecall={:.3}",
            key,
            output.selected_article_ids.len(),
            output.analysis.precision,
            output.analysis.recall
        );

        if let Some(dir) = &cli.features_csv {
            write_features(File::create(dir.join(format!("{}_features.csv", key)))?, &output.features)?;
        }
        if let Some(dir) = &cli.analysis_csv {
            write_analysis(File::create(dir.join(format!("{}_analysis.csv", key)))?, &key, &output.analysis)?;
        }
        if let Some(dir) = &cli.term_matrix {
            write_term_matrix(
                File::create(dir.join(format!("{}_terms.csv", key)))?,
                &output.articles,
                &output.dictionary,
                &params.gold_standard,
            )?;
        }
        if let Some(dir) = &cli.snapshot {
            let path = dir.join(format!("{}.cbor", key));
            std::fs::write(&path, output.to_cbor()?)?;
            info!(path = %path.display(), "snapshot written");
        }
    }
    Ok(())
}
