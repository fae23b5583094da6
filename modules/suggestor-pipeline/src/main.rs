use std::sync::Arc;

use ai_client::OpenAi;
use anyhow::{Context, Result};
use apify_client::ApifyClient;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use suggestor_common::{new_task_id, Config, TaskRecord};
use suggestor_pipeline::scrape::{analyze_urls, validate_urls};
use suggestor_pipeline::storage::read_items;
use suggestor_pipeline::{FileTaskStore, Pipeline, TaskStore};
use suggestor_remix::{ApifyTranscripts, RemixKind, Remixer};

#[derive(Parser)]
#[command(name = "suggestor", about = "Pick the best recent posts across social profiles")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape profile URLs into the raw buffer
    Scrape {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Normalize the raw buffer into canonical items
    Retrieve,
    /// Score canonical items and write the numbered selection
    Select {
        /// Desired selection size
        #[arg(long)]
        target: Option<usize>,
    },
    /// Scrape, retrieve, and select in one go, recording a task
    Run {
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(long)]
        target: Option<usize>,
    },
    /// Print a stored task record
    Task { task_id: String },
    /// Rewrite a selected post as a script or a hook
    Remix {
        /// Label from the selection, e.g. post_1
        post_number: String,
        #[arg(long, value_enum, default_value = "script")]
        kind: Kind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Script,
    Hook,
}

impl From<Kind> for RemixKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Script => RemixKind::Script,
            Kind::Hook => RemixKind::Hook,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let mut config = Config::from_env()?;
    config.log_redacted();

    match cli.command {
        Command::Scrape { urls } => {
            validate_urls(&urls)?;
            let scraper = ApifyClient::new(config.require_apify_key()?.to_string());
            let pipeline = Pipeline::new(config);
            let mut record = TaskRecord::new(new_task_id(), analyze_urls(&urls));
            let outcome = pipeline.scrape(&scraper, &mut record).await?;
            println!(
                "Scraped {} records ({} ok, {} failed) into {}",
                outcome.records,
                outcome.successful.len(),
                outcome.failed.len(),
                pipeline.buffer().path().display()
            );
        }
        Command::Retrieve => {
            let pipeline = Pipeline::new(config);
            let outcome = pipeline.retrieve()?;
            println!(
                "Wrote {} canonical items to {}",
                outcome.items.len(),
                pipeline.config().canonical_path().display()
            );
        }
        Command::Select { target } => {
            let target = target.unwrap_or(config.target_total);
            let pipeline = Pipeline::new(config);
            let (selection, _) = pipeline.select(target)?;
            println!(
                "Selected {} items into {}",
                selection.items.len(),
                pipeline.config().result_path().display()
            );
        }
        Command::Run { urls, target } => {
            if let Some(target) = target {
                config.target_total = target;
            }
            let scraper = ApifyClient::new(config.require_apify_key()?.to_string());
            let store = FileTaskStore::new(config.tasks_dir.clone());
            let pipeline = Pipeline::new(config);
            let record = pipeline.run(&urls, &scraper, &store).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            if let Some(error) = record.error {
                anyhow::bail!("task {} failed: {error}", record.task_id);
            }
        }
        Command::Task { task_id } => {
            let store = FileTaskStore::new(config.tasks_dir.clone());
            let record = store
                .get(&task_id)?
                .with_context(|| format!("Task not found: {task_id}"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Remix { post_number, kind } => {
            let path = config.result_path();
            let items = read_items(&path)?;
            let item = items
                .iter()
                .find(|i| i.post_number.as_deref() == Some(post_number.as_str()))
                .with_context(|| format!("{post_number} not found in {}", path.display()))?;

            let remixer = Remixer::new(
                Arc::new(OpenAi::new(config.require_openai_key()?, config.openai_model.clone())),
                Arc::new(ApifyTranscripts::new(
                    ApifyClient::new(config.require_apify_key()?.to_string()),
                    config.transcript_language.clone(),
                )),
            );
            println!("{}", remixer.remix(kind.into(), item).await?);
        }
    }

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("suggestor=info".parse()?)
        .add_directive("apify_client=info".parse()?)
        .add_directive("ai_client=info".parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
