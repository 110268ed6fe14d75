use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use finhealth::commands::{self, Dashboard, OutputOptions};
use finhealth::config::{ClientConfig, CompanyProfile, Industry, DEFAULT_LANGUAGE};
use finhealth::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "finhealth")]
#[command(about = "SME financial health dashboard - analyze statements, connect banks, export reports")]
#[command(version)]
struct Cli {
  /// Base URL of the analysis service [default: $FINHEALTH_API_URL or http://127.0.0.1:8000]
  #[arg(long, global = true)]
  api_url: Option<String>,

  /// Request timeout in seconds [default: $FINHEALTH_TIMEOUT_SECS or 30]
  #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
  timeout_secs: Option<u64>,

  /// Show debug diagnostics
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Args)]
struct ProfileArgs {
  /// Company name the analysis is for
  #[arg(short, long, default_value = "")]
  company: String,

  /// Industry of the company
  #[arg(short, long, value_enum, default_value_t = Industry::Retail)]
  industry: Industry,

  /// Language for the AI narrative
  #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
  language: String,
}

impl From<&ProfileArgs> for CompanyProfile {
  fn from(args: &ProfileArgs) -> Self {
    CompanyProfile::new(args.company.clone(), args.industry).with_language(args.language.clone())
  }
}

#[derive(Args)]
struct OutputArgs {
  /// Print the dashboard as JSON
  #[arg(long)]
  json: bool,

  /// Export the investor report (PDF) into this directory
  #[arg(long)]
  report_dir: Option<PathBuf>,
}

impl From<&OutputArgs> for OutputOptions {
  fn from(args: &OutputArgs) -> Self {
    OutputOptions { json: args.json, report_dir: args.report_dir.clone() }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Upload a statement (.csv, .pdf or GSTR-1 .json) for analysis
  Analyze {
    /// Statement to upload
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(flatten)]
    profile: ProfileArgs,

    #[command(flatten)]
    output: OutputArgs,
  },
  /// Connect a simulated bank feed and analyze it right away
  ConnectBank {
    /// Bank to connect (HDFC Bank, ICICI Bank, SBI, Chase)
    bank: String,

    #[command(flatten)]
    profile: ProfileArgs,

    #[command(flatten)]
    output: OutputArgs,
  },
  /// Show the compliance audit log
  Logs {
    /// Print the log as JSON
    #[arg(long)]
    json: bool,
  },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
  let cli = Cli::parse();
  logging::init_tracing(cli.verbose);

  if let Err(e) = run(cli).await {
    logging::error(&format!("{e:#}"));
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<()> {
  let config = ClientConfig::from_env().with_overrides(cli.api_url, cli.timeout_secs);

  let dashboard = Dashboard::connect(&config)?;
  dashboard.start().await;

  match cli.command {
    Commands::Analyze { file, profile, output } => {
      let profile = CompanyProfile::from(&profile);
      let output = OutputOptions::from(&output);
      commands::analyze::handle(&dashboard, &profile, file, &output).await
    }
    Commands::ConnectBank { bank, profile, output } => {
      let profile = CompanyProfile::from(&profile);
      let output = OutputOptions::from(&output);
      commands::connect_bank::handle(&dashboard, &profile, &bank, &output).await
    }
    Commands::Logs { json } => commands::logs::handle(&dashboard, json).await,
  }
}
