use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use feedback_dashboard::client::HttpAnalysisService;
use feedback_dashboard::config::Config;
use feedback_dashboard::models::FeedbackRecord;
use feedback_dashboard::report;
use feedback_dashboard::session::FeedbackSession;
use feedback_dashboard::submit::{CsvUpload, ManualEntry};
use feedback_dashboard::view::View;

#[derive(Parser)]
#[command(name = "feedback-dashboard")]
#[command(about = "Sentiment dashboard for educational feedback", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Analysis service base URL, overriding config and environment
    #[arg(long, global = true)]
    service_url: Option<String>,
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single comment
    Analyze {
        #[arg(long)]
        comment: String,
        #[arg(long)]
        department: Option<String>,
        /// Render the full dashboard afterwards
        #[arg(long)]
        show: bool,
    },
    /// Analyze every comment in a CSV file
    Upload {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        show: bool,
    },
    /// Show charts and the results table for stored feedback
    Dashboard,
    /// Download all stored feedback as CSV
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value = "feedback_report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref(), cli.service_url.as_deref())
        .context("failed to load configuration")?;
    log::debug!("using analysis service at {}", config.service_base_url);

    let service = HttpAnalysisService::new(&config).context("failed to build HTTP client")?;
    let view = View::new(!cli.no_color, config.comment_width);

    match cli.command {
        Commands::Analyze {
            comment,
            department,
            show,
        } => {
            let record = ManualEntry::new()
                .submit(&service, &comment, department.as_deref())
                .await?;
            finish_submission(&service, &view, vec![record], show).await;
        }
        Commands::Upload { csv, show } => {
            let records = CsvUpload::new().submit(&service, csv.as_deref()).await?;
            println!("Analyzed {} comments.", records.len());
            finish_submission(&service, &view, records, show).await;
        }
        Commands::Dashboard => {
            let mut session = FeedbackSession::new();
            session.load(&service).await;
            print!("{}", view.dashboard(session.records()));
        }
        Commands::Export { dir } => {
            let exported = FeedbackSession::new()
                .export(&service, &dir, &config.export_file_name)
                .await?;
            println!(
                "Saved {} ({}, {} bytes, {} rows) to {}.",
                exported.file_name,
                exported.media_type,
                exported.bytes,
                exported.rows,
                exported.path.display()
            );
        }
        Commands::Report { department, out } => {
            let mut session = FeedbackSession::new();
            session.load(&service).await;

            let records: Vec<FeedbackRecord> = match department.as_deref() {
                Some(name) => session
                    .records()
                    .iter()
                    .filter(|record| record.department_label() == name)
                    .cloned()
                    .collect(),
                None => session.records().to_vec(),
            };

            let report = report::build_report(department.as_deref(), report::today(), &records);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Prints the new records, or with `show` the whole dashboard with them
/// placed ahead of the stored list.
async fn finish_submission(
    service: &HttpAnalysisService,
    view: &View,
    records: Vec<FeedbackRecord>,
    show: bool,
) {
    if !show {
        print!("{}", view.results_table(&records));
        return;
    }

    let mut session = FeedbackSession::new();
    session.load(service).await;
    let added = session.merge_submitted(records);
    log::debug!("{added} submitted records were not in the stored list yet");
    print!("{}", view.dashboard(session.records()));
}
