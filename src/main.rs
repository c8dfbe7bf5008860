use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bag_report::config::{Config, ConfigOverrides};
use bag_report::output::{
    corrected_to_csv, discrepancies_to_csv, render_discrepancy_table, render_json,
    render_preview_table, render_summary_table, render_template_json, render_template_table,
    template_to_csv, ProcessReport,
};
use bag_report::pipeline::run_report;
use bag_report::record::read_batch_from_path;
use bag_report::schema::COLUMN_COUNT;
use bag_report::server::run_server;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "bag-report",
    about = "Recalculate active bag report status fields and report drift"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Evaluation date (YYYY-MM-DD) used instead of the local date.
    #[arg(long)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recalculate an uploaded report and list corrections.
    Process {
        input: PathBuf,
        /// Write the corrected report as CSV to this path.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Use display labels in the exported CSV.
        #[arg(long, conflicts_with = "no_labels")]
        labels: bool,
        /// Use template headers in the exported CSV.
        #[arg(long)]
        no_labels: bool,
        #[arg(long)]
        preview: bool,
        #[arg(long, default_value_t = 20)]
        preview_rows: usize,
    },
    /// Check an upload against the column template without processing it.
    Validate { input: PathBuf },
    /// List the expected template columns.
    Template,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    let display_labels = match &cli.command {
        Commands::Process {
            labels, no_labels, ..
        } if *labels || *no_labels => Some(*labels),
        _ => None,
    };
    config.apply_overrides(ConfigOverrides {
        evaluation_date: cli.today,
        host,
        port,
        display_labels,
    });

    match &cli.command {
        Commands::Process {
            input,
            export,
            preview,
            preview_rows,
            ..
        } => {
            let batch = read_batch_from_path(input)
                .with_context(|| format!("failed loading report: {}", input.display()))?;
            let run = run_report(&config.rule_engine(), &batch, &config.report.fields)?;
            print_report(&run.report, cli.output)?;
            if *preview {
                println!("{}", render_preview_table(&run.corrected, *preview_rows));
            }
            if let Some(path) = export {
                let labels = config.export.display_labels;
                let csv = corrected_to_csv(&run.corrected, labels)?;
                write_export(path, &csv)?;
                info!(path = %path.display(), labels, "wrote corrected report");
            }
        }
        Commands::Validate { input } => {
            let batch = read_batch_from_path(input)
                .with_context(|| format!("failed validating report: {}", input.display()))?;
            println!(
                "Template OK: {} rows, {COLUMN_COUNT} columns in expected order",
                batch.len()
            );
        }
        Commands::Template => print_template(cli.output)?,
        Commands::Serve { .. } => {
            let bind = config.bind_addr();
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await?;
        }
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
        }
    }

    Ok(())
}

fn print_report(report: &ProcessReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_summary_table(&report.summary));
            if report.discrepancies.is_empty() {
                println!("No corrections needed.");
            } else {
                println!("{}", render_discrepancy_table(&report.discrepancies));
            }
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", discrepancies_to_csv(&report.discrepancies)?),
    }
    Ok(())
}

fn print_template(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_template_table()),
        OutputFormat::Json => println!("{}", render_template_json()?),
        OutputFormat::Csv => print!("{}", template_to_csv()?),
    }
    Ok(())
}

fn write_export(path: &Path, csv: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating export directory: {}", parent.display()))?;
    }
    fs::write(path, csv).with_context(|| format!("failed writing export: {}", path.display()))
}
