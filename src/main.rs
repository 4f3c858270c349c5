use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use results_report::app::ReportApp;
use results_report::config::{ParetoScope, ReportConfig};
use results_report::export;
use results_report::filter::FilterState;
use results_report::loader::{ResultsLoader, ResultsSource};
use results_report::page;
use results_report::results::StatusTag;
use results_report::stats;
use results_report::Result;

#[derive(Parser)]
#[command(
    name = "results-report",
    version,
    about = "Render an HTML report from a results.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the HTML report
    Render {
        /// Results file path or http(s) URL
        #[arg(long, default_value = "results.json")]
        results: String,

        /// Output HTML file
        #[arg(long, default_value = "report/index.html")]
        out: PathBuf,

        /// Comma-separated status tags to hide (e.g. crash,timeout)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<StatusTag>,

        /// TOML file with report options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Hide the pareto curve while any filter is active
        #[arg(long, default_value_t = false)]
        pareto_follows_filters: bool,
    },

    /// Print the summary statistics
    Summary {
        /// Results file path or http(s) URL
        #[arg(long, default_value = "results.json")]
        results: String,

        /// Maximum accuracy score (bits)
        #[arg(long, default_value = "64")]
        max_score: f64,
    },

    /// Write the visible table rows as CSV
    ExportCsv {
        /// Results file path or http(s) URL
        #[arg(long, default_value = "results.json")]
        results: String,

        /// Output CSV file
        #[arg(long, default_value = "report/results.csv")]
        out: PathBuf,

        /// Comma-separated status tags to hide
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<StatusTag>,

        /// Maximum accuracy score (bits)
        #[arg(long, default_value = "64")]
        max_score: f64,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ReportConfig> {
    match path {
        Some(p) => ReportConfig::load(p),
        None => Ok(ReportConfig::default()),
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            results,
            out,
            exclude,
            config,
            pareto_follows_filters,
        } => {
            let mut config = load_config(config.as_ref())?;
            config.exclude.extend(exclude);
            if pareto_follows_filters {
                config.pareto_scope = ParetoScope::HideWhenFiltered;
            }

            let loader = ResultsLoader::new(ResultsSource::parse(&results));
            let app = ReportApp::new(loader, config);
            // The page is written either way; a failed load still fails the run.
            let loaded = app.results();
            page::save_report(&app.html_for(&loaded), &out)?;
            let doc = loaded?;
            let shown = app.filter().visible(&doc.tests).count();
            println!(
                "Rendered {} of {} tests to {}",
                shown,
                doc.tests.len(),
                out.display()
            );
        }

        Commands::Summary { results, max_score } => {
            let loader = ResultsLoader::new(ResultsSource::parse(&results));
            let doc = loader.get_results()?;
            let s = stats::compute_summary(&doc, max_score);
            println!("Tests:        {}", s.total_tests);
            println!(
                "Accuracy:     {} -> {}",
                stats::format_percent(s.mean_start_pct),
                stats::format_percent(s.mean_end_pct)
            );
            println!("Time:         {}", s.time_label());
            println!("Bad runs:     {}", s.bad_runs_label());
            println!("Speedup:      {}", s.speedup_label());
        }

        Commands::ExportCsv {
            results,
            out,
            exclude,
            max_score,
        } => {
            let loader = ResultsLoader::new(ResultsSource::parse(&results));
            let doc = loader.get_results()?;
            let filter = FilterState::with_excluded(exclude);
            let rows = export::write_csv(&doc, &filter, max_score, &out)?;
            println!("Saved {} rows to {}", rows, out.display());
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
