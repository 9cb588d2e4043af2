use anyhow::Context;
use clap::{Parser, Subcommand};
use reqsift_api::{ApiConfig, RestApi, DEFAULT_MAX_UPLOAD_BYTES};
use reqsift_core::DEFAULT_ANOMALOUS_LABEL;
use reqsift_detector::Detector;
use reqsift_schema::DEFAULT_TOP_K;
use reqsift_storage::ArtifactStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Flag bad HTTP requests with a pre-trained k-means model
#[derive(Parser, Debug)]
#[command(name = "reqsift")]
#[command(about = "Bad request detector", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ModelArgs {
    /// Directory holding the fitted model artifacts
    #[arg(short, long, default_value = "./model")]
    artifacts_dir: PathBuf,

    /// Label that marks a request as bad
    #[arg(long, default_value = DEFAULT_ANOMALOUS_LABEL)]
    anomalous_label: String,

    /// Categories kept per column before the rest become "Other"
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// HTTP API port
        #[arg(long, default_value_t = 8000)]
        http_port: u16,

        /// Largest accepted upload in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,
    },
    /// Classify a CSV file offline
    Classify {
        #[command(flatten)]
        model: ModelArgs,

        /// Input CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Write every row with its label instead of only the bad ones
        #[arg(long)]
        all: bool,
    },
    /// Print a summary of the model artifacts as JSON
    Inspect {
        #[command(flatten)]
        model: ModelArgs,
    },
}

fn load_detector(model: &ModelArgs) -> anyhow::Result<Detector> {
    let artifacts = ArtifactStore::new(&model.artifacts_dir).load()?;
    Ok(Detector::with_anomalous_label(Arc::new(artifacts), model.anomalous_label.clone())
        .with_top_k(model.top_k))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Serve {
            model,
            host,
            http_port,
            max_upload_bytes,
        } => {
            info!("Starting reqsift v{}", env!("CARGO_PKG_VERSION"));
            info!("Artifacts directory: {:?}", model.artifacts_dir);
            let detector = load_detector(&model)?;

            let config = ApiConfig {
                host,
                port: http_port,
                max_upload_bytes,
            };
            serve(detector, config).await
        }
        Command::Classify {
            model,
            input,
            output,
            all,
        } => {
            let detector = load_detector(&model)?;
            let data = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let csv = if all {
                detector.annotate_csv(&data)?
            } else {
                detector.detect_csv(&data)?
            };
            std::fs::write(&output, &csv)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("Wrote {} bytes to {:?}", csv.len(), output);
            Ok(())
        }
        Command::Inspect { model } => {
            let detector = load_detector(&model)?;
            let summary = detector.artifacts().summary();
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

async fn serve(detector: Detector, config: ApiConfig) -> anyhow::Result<()> {
    let port = config.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", config.port);
        RestApi::run(detector, config)
    });

    info!("reqsift started successfully");
    info!("HTTP API: http://localhost:{}/", port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match joined {
                Ok(Ok(result)) => result.context("HTTP server failed")?,
                _ => anyhow::bail!("HTTP server thread panicked"),
            }
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
