use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use pipescore::application::score_pipeline::ScoreRequest;
use pipescore::cli::commands::{Cli, Commands};
use pipescore::config::Config;
use pipescore::PipeScore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_command(&config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(config: &Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Score {
            input,
            since,
            min_score,
            limit,
            output,
            no_save,
        } => {
            let ps = PipeScore::new(config, input.as_deref())?;
            let request = ScoreRequest {
                since: lookback_start(&since, config.lookback_days)?,
                min_score,
                limit,
                persist: !no_save,
            };
            let run = ps.score(&request).await?;
            let json = serde_json::to_string_pretty(&run)?;
            if let Some(path) = output {
                tokio::fs::write(&path, &json).await?;
                info!("Run {} written to {path}", run.id);
            }
            println!("{json}");
        }
        Commands::Profiles { input, since } => {
            let ps = PipeScore::new(config, input.as_deref())?;
            let report = ps.profiles(lookback_start(&since, config.lookback_days)?).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::History { limit } => {
            let runs = PipeScore::history_store(&config.db_path)?.list(limit)?;
            println!("{}", serde_json::to_string_pretty(&runs)?);
        }
        Commands::Show { id } => {
            let run = PipeScore::history_store(&config.db_path)?.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&run)?);
        }
    }
    Ok(())
}

fn lookback_start(since: &Option<String>, lookback_days: i64) -> Result<NaiveDate, String> {
    match since {
        None => Ok(Utc::now().date_naive() - Duration::days(lookback_days)),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format: {s}. Use YYYY-MM-DD")),
    }
}
