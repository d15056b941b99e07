use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use datapledge::flows::DemoFlow;
use datapledge::{
    util, Config, DirectorySink, FileRef, HeadlessVisualisation, ProcessingEngine, WorkerSandbox,
};

#[derive(Parser)]
#[command(name = "datapledge", version, about = "Local data-donation flow engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in demo flow headless
    Run {
        /// File offered to the script's file prompt
        #[arg(long)]
        file: Option<PathBuf>,
        /// Directory donations are written to
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to file (~/.datapledge/logs/datapledge.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config = Config::load();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, out } => run_flow(config, file, out).await,
    }
}

async fn run_flow(config: Config, file: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let out = out.unwrap_or(config.output_dir);
    let files: Vec<FileRef> = file
        .or(config.input_file)
        .map(FileRef::from_path)
        .into_iter()
        .collect();

    let sandbox = WorkerSandbox::new(|| Box::new(DemoFlow::new("Files")));
    let visualisation = HeadlessVisualisation::new(files, config.locale);
    let sink = DirectorySink::new(&out);

    let mut engine = ProcessingEngine::new(sandbox, Box::new(visualisation), Box::new(sink));
    engine.run().await?;

    println!(
        "session {} complete; donations (if any) are in {}",
        engine.session().id(),
        out.display()
    );
    Ok(())
}
