use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pipescore", about = "Score open pipeline opportunities against account history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score the open pipeline and print the ranked run as JSON
    Score {
        /// JSON snapshot with closed_won, closed_lost and open arrays (default: query Salesforce)
        #[arg(long)]
        input: Option<String>,
        /// Start of the historical window (YYYY-MM-DD; default: lookback days before today)
        #[arg(long)]
        since: Option<String>,
        /// Only keep opportunities scoring at least this much
        #[arg(long)]
        min_score: Option<f64>,
        /// Keep at most this many opportunities
        #[arg(long)]
        limit: Option<usize>,
        /// Also write the run JSON to this file
        #[arg(long)]
        output: Option<String>,
        /// Do not record the run in the history database
        #[arg(long)]
        no_save: bool,
    },
    /// Print account profiles and cohort statistics as JSON
    Profiles {
        /// JSON snapshot with closed_won and closed_lost arrays (default: query Salesforce)
        #[arg(long)]
        input: Option<String>,
        /// Start of the historical window (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
    },
    /// List recorded score runs, newest first
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Print a recorded score run
    Show {
        /// Run ID
        id: String,
    },
}
