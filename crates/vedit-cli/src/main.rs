//! VideoEdit CLI.
//!
//! Thin terminal front-end over `vedit-client`: upload a video as a new
//! processing job, watch the polled job table, or print the list once. All
//! job semantics live in the client crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vedit_client::{ClientConfig, JobPoller, JobServiceClient, SubmissionClient, UploadOutcome};
use vedit_models::{JobRecord, JobStatus};

#[derive(Parser)]
#[command(name = "vedit")]
#[command(about = "VideoEdit job service client", long_about = None)]
struct Cli {
    /// Job service URL
    #[arg(long, env = "VEDIT_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video file as a new processing job
    Upload {
        /// Path to the video file
        path: PathBuf,
    },
    /// Watch the job list, refreshed on the poll interval, until Ctrl-C
    Watch,
    /// Print the current job list once
    Jobs,
}

/// Default log directives, one per workspace crate target.
const DEFAULT_LOG_DIRECTIVES: [&str; 2] = ["vedit_cli=info", "vedit_client=info"];

fn default_env_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for directive in DEFAULT_LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(default_env_filter()?)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().with_base_url(cli.api_url);
    let poll_interval = config.poll_interval;
    let service = Arc::new(JobServiceClient::new(config)?);

    match cli.command {
        Commands::Upload { path } => upload(service, poll_interval, path).await,
        Commands::Watch => watch(service, poll_interval).await,
        Commands::Jobs => list_once(service).await,
    }
}

async fn upload(service: Arc<JobServiceClient>, poll_interval: Duration, path: PathBuf) -> Result<()> {
    let poller = Arc::new(JobPoller::new(Arc::clone(&service), poll_interval));
    let uploader = SubmissionClient::new(service, Arc::clone(&poller));

    uploader.select_file(&path).await;

    match uploader.upload().await {
        Ok(UploadOutcome::Submitted) => {
            println!(
                "{}",
                "Video uploaded successfully. Your video is now being processed.".green()
            );
            render_jobs(&poller.jobs().await);
            Ok(())
        }
        Ok(UploadOutcome::NothingSelected) => {
            println!("No file selected.");
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Upload failed:".red(), e);
            std::process::exit(1);
        }
    }
}

async fn watch(service: Arc<JobServiceClient>, poll_interval: Duration) -> Result<()> {
    let poller = Arc::new(JobPoller::new(service, poll_interval));
    poller.start().await;
    info!("watching jobs (Ctrl-C to stop)");

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut last: Option<Vec<JobRecord>> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let jobs = poller.jobs().await;
                if last.as_ref() != Some(&jobs) {
                    render_jobs(&jobs);
                    last = Some(jobs);
                }
            }
        }
    }

    poller.stop().await;
    info!("stopped watching");
    Ok(())
}

async fn list_once(service: Arc<JobServiceClient>) -> Result<()> {
    let jobs = service.list_jobs().await?;
    render_jobs(&jobs);
    Ok(())
}

fn render_jobs(jobs: &[JobRecord]) {
    if jobs.is_empty() {
        println!("No jobs.");
        return;
    }

    println!("{:<40} {:<12} {}", "FILE", "STATUS", "PROGRESS");
    for job in jobs {
        let status = match job.status {
            JobStatus::Pending => job.status.as_str().yellow(),
            JobStatus::Processing => job.status.as_str().blue(),
            JobStatus::Completed => job.status.as_str().green(),
            JobStatus::Failed => job.status.as_str().red(),
        };
        println!("{:<40} {:<12} {:>3}%", job.filename, status, job.progress);
    }
}
