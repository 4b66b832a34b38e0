use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cv_reader::config::AgentBackend;

#[derive(Parser, Debug)]
#[command(
    name = "cv-reader",
    about = "Ask questions about a CV with an agent and score the answers"
)]
pub struct CliArgs {
    /// Config file (default: ~/.config/cv-reader/config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    /// Where the agent runs
    #[arg(long, value_enum, global = true)]
    pub backend: Option<AgentBackend>,
    /// Log level spec, e.g. `debug` or `info,cv_reader=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Ask a single question about the document
    Ask {
        query: Option<String>,
        #[arg(long, short = 'd')]
        document: Option<PathBuf>,
    },
    /// Print the text the PDF reader tool extracts from a file
    Read { path: PathBuf },
    /// Answer every query of a CSV table
    Generate {
        #[arg(long, short = 'i')]
        input: PathBuf,
        #[arg(long, short = 'o')]
        output: PathBuf,
        #[arg(long, short = 'd')]
        document: Option<PathBuf>,
        /// Rewrite the output table after every query
        #[arg(long)]
        checkpoint: bool,
    },
    /// Score the answers of a result table
    Evaluate {
        #[arg(long, short = 'i')]
        input: PathBuf,
        /// Write the scored table here
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Answer, save and score in one go
    Run {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        #[arg(long)]
        scored_output: Option<PathBuf>,
        #[arg(long, short = 'd')]
        document: Option<PathBuf>,
        #[arg(long)]
        checkpoint: bool,
        #[arg(long)]
        skip_eval: bool,
    },
}
