use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cv_reader::agent::{Agent, AgentPlatformClient, AgentSpec, LocalAgent};
use cv_reader::backends::openai::OpenAI;
use cv_reader::config::{load_config, AgentBackend, AppConfig};
use cv_reader::dataset::{load_queries, save_results};
use cv_reader::evaluator::{evaluate_results, GEvalGenerationEvaluator, GenerationEvaluator};
use cv_reader::pipeline::{ask, run_pipeline, PipelineOptions, DEFAULT_ASK_QUERY};
use cv_reader::runner::QueryRunner;
use cv_reader::tools::{PdfReaderTool, ToolRegistry};

use crate::args::{CliArgs, Command};
use crate::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut loaded = load_config(args.config.clone())?;
    if let Some(level) = &args.log_level {
        loaded.config.logging.level = level.clone();
    }
    if let Some(backend) = args.backend {
        loaded.config.agent.backend = backend;
    }
    let _logger = init_logging(&loaded.config.logging, &loaded.paths)?;
    let config = loaded.config;

    match args.command {
        Command::Read { path } => {
            println!("{}", PdfReaderTool::new().run(&path));
            Ok(())
        }
        Command::Ask { query, document } => {
            let query = query.unwrap_or_else(|| DEFAULT_ASK_QUERY.to_string());
            let document = document_or_default(document, &config);
            let agent = build_agent(&config).await?;
            println!("Query: {query}");
            let answer = ask(agent.as_ref(), &query, &document).await;
            delete_agent(agent.as_ref()).await;
            println!("Response: {}", answer?);
            Ok(())
        }
        Command::Generate {
            input,
            output,
            document,
            checkpoint,
        } => {
            let queries = load_queries(&input)
                .with_context(|| format!("loading queries from {}", input.display()))?;
            let document = document_or_default(document, &config);
            let agent = build_agent(&config).await?;
            let mut runner = QueryRunner::new(agent.as_ref());
            if checkpoint {
                runner = runner.with_checkpoint(&output);
            }
            let results = runner.process(&queries, &document).await;
            delete_agent(agent.as_ref()).await;
            save_results(&results, &output)?;
            println!("\nResults saved to {}", output.display());
            Ok(())
        }
        Command::Evaluate { input, output } => {
            let evaluator = build_evaluator(&config)?;
            evaluate_results(&evaluator, &input, output.as_deref()).await?;
            if let Some(path) = output {
                println!("\nScored results saved to {}", path.display());
            }
            Ok(())
        }
        Command::Run {
            csv,
            output,
            scored_output,
            document,
            checkpoint,
            skip_eval,
        } => {
            let mut options = PipelineOptions::from(&config.pipeline);
            options.csv_file = csv.unwrap_or(options.csv_file);
            options.output = output.or(options.output);
            options.scored_output = scored_output.or(options.scored_output);
            options.document = document.unwrap_or(options.document);
            options.checkpoint |= checkpoint;
            options.skip_evaluation |= skip_eval;

            let evaluator = if options.skip_evaluation {
                None
            } else {
                Some(build_evaluator(&config)?)
            };
            let agent = build_agent(&config).await?;
            run_pipeline(
                agent.as_ref(),
                evaluator.as_ref().map(|e| e as &dyn GenerationEvaluator),
                &options,
            )
            .await?;
            Ok(())
        }
    }
}

fn document_or_default(document: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    document.unwrap_or_else(|| PathBuf::from(&config.pipeline.document))
}

async fn build_agent(config: &AppConfig) -> anyhow::Result<Box<dyn Agent>> {
    let spec = AgentSpec::cv_reader();
    match config.agent.backend {
        AgentBackend::Remote => {
            let client = AgentPlatformClient::new(
                config.agent.require_api_url()?,
                config.agent.require_api_key()?,
                config.agent.timeout_seconds,
            )?;
            let agent = client
                .create_agent(&spec)
                .await
                .context("creating agent on the platform")?;
            Ok(Box::new(agent))
        }
        AgentBackend::Local => {
            let local = &config.local;
            let provider = OpenAI::new(
                local.require_api_key()?,
                local.base_url.clone(),
                Some(local.model.clone()),
                local.max_tokens,
                local.temperature,
                local.timeout_seconds,
                None,
            )?;
            log::info!("running agent {} locally on {}", spec.name, local.model);
            let agent = LocalAgent::new(spec, Arc::new(provider), ToolRegistry::with_pdf_reader())
                .with_max_tool_rounds(local.max_tool_rounds);
            Ok(Box::new(agent))
        }
    }
}

fn build_evaluator(config: &AppConfig) -> anyhow::Result<GEvalGenerationEvaluator> {
    let eval = &config.evaluator;
    Ok(GEvalGenerationEvaluator::from_model_with(
        &eval.model,
        eval.require_api_key()?,
        eval.base_url.clone(),
        eval.timeout_seconds,
    )?)
}

async fn delete_agent(agent: &dyn Agent) {
    if let Err(err) = agent.delete().await {
        log::error!("failed to delete agent {}: {err}", agent.name());
    }
}

