//! RAG CLI - Ask questions grounded on an Elasticsearch index.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rag_core::{RagConfig, RagError};
use rag_llm::OpenAiClient;
use rag_query::{check_question, PromptTemplate, RagPipeline};
use rag_search::ElasticsearchRetriever;

/// rag - Question answering over Elasticsearch with an LLM
#[derive(Parser)]
#[command(name = "rag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/elasticdocs-rag/config.toml, then ./elasticdocs-rag.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question using retrieved passages
    Ask {
        /// The question
        question: String,

        /// Print the full answer record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the system prompt that would be sent for a question
    Context {
        /// The question
        question: String,
    },

    /// Print the Elasticsearch request body for a question
    Query {
        /// The question
        question: String,
    },

    /// Print the effective configuration with secrets masked
    Config,
}

type Pipeline = RagPipeline<ElasticsearchRetriever, OpenAiClient>;

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<PathBuf>) -> Result<RagConfig, RagError> {
    let mut config = match path {
        Some(path) => RagConfig::load(&path)?,
        None => RagConfig::load_default()?,
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn build_pipeline(config: &RagConfig) -> Result<Pipeline, RagError> {
    let retriever = Arc::new(ElasticsearchRetriever::new(&config.elasticsearch)?);
    let generator = Arc::new(OpenAiClient::new(&config.llm)?);
    let template = PromptTemplate::from_config(config.prompt.template.as_deref());

    Ok(RagPipeline::new(
        retriever,
        generator,
        config.elasticsearch.fields.clone(),
        template,
    )
    .with_max_context_words(config.prompt.max_context_words))
}

/// Request body `ask` would send to Elasticsearch for `question`.
fn query_body(config: &RagConfig, question: &str) -> Result<serde_json::Value, RagError> {
    check_question(question)?;
    let retriever = ElasticsearchRetriever::new(&config.elasticsearch)?;
    Ok(retriever.search_body(question))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error [{}]: {}", e.error_code(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RagError> {
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Ask { question, json } => {
            let pipeline = build_pipeline(&config)?;
            let answer = pipeline.ask(&question).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("Answer: {}", answer.answer);
            }
        }
        Commands::Context { question } => {
            let pipeline = build_pipeline(&config)?;
            let prepared = pipeline.build_prompt(&question).await?;
            println!("{}", prepared.prompt);
        }
        Commands::Query { question } => {
            let body = query_body(&config, &question)?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Config => {
            let shown = toml::to_string_pretty(&config.redacted())
                .map_err(|e| RagError::config(format!("Failed to render config: {}", e)))?;
            print!("{}", shown);
        }
    }

    Ok(())
}
