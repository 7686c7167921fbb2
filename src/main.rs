// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hcris_dashboard::config::{
    DashboardConfig, DEFAULT_EXPORT_DIR, DEFAULT_LOG_FILTER, EXPORT_DIR_ENV, TUI_LOG_FILTER,
    VIEW_ENV, YEAR_ENV,
};
use hcris_dashboard::{
    render_view, write_export, DataQualityEngine, JsonRenderer, Renderer, SampleDataCache,
    TextRenderer, View, DEFAULT_YEAR,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// HCRIS hospital analytics dashboard
#[derive(Parser)]
#[command(name = "hcris-dashboard", version, about = "HCRIS hospital analytics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// View opened first in the terminal dashboard
    #[arg(long, global = true, env = VIEW_ENV, default_value = "Overview")]
    view: String,

    /// Contract labor year
    #[arg(long, global = true, env = YEAR_ENV, default_value_t = DEFAULT_YEAR)]
    year: u16,

    /// Directory the CSV export is written to
    #[arg(long = "out-dir", global = true, env = EXPORT_DIR_ENV, default_value = DEFAULT_EXPORT_DIR)]
    out_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,

    /// Print one view
    Show {
        /// View label or slug, e.g. "contract-labor"
        #[arg(value_name = "VIEW")]
        target: String,

        /// Emit the view report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write all base tables to one CSV file
    Export,

    /// Check the base tables and print the quality report
    Validate,
}

impl Cli {
    fn config(&self) -> DashboardConfig {
        DashboardConfig::default()
            .with_view_label(&self.view)
            .with_year(self.year)
            .with_export_dir(self.out_dir.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Tui));
    init_logging(interactive);

    let config = cli.config();
    let cache = SampleDataCache::new();

    match &cli.command {
        None | Some(Command::Tui) => run_ui_mode(&cache, &config)?,
        Some(Command::Show { target, json }) => run_show(&cache, &config, target, *json)?,
        Some(Command::Export) => run_export(&cache, &config)?,
        Some(Command::Validate) => run_validate(&cache)?,
    }

    Ok(())
}

fn init_logging(interactive: bool) {
    // The TUI owns the terminal, so only warnings get through by default
    let default = if interactive { TUI_LOG_FILTER } else { DEFAULT_LOG_FILTER };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn run_show(cache: &SampleDataCache, config: &DashboardConfig, label: &str, json: bool) -> Result<()> {
    let data = cache.sample_data();
    let report = render_view(View::select(label), &data, &config.view_options());

    let output = if json {
        JsonRenderer::new(true).render(&report)
    } else {
        TextRenderer::new().render(&report)
    }
    .context("Failed to render view")?;

    println!("{}", output);
    Ok(())
}

fn run_export(cache: &SampleDataCache, config: &DashboardConfig) -> Result<()> {
    println!("💾 Exporting dashboard data");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let data = cache.sample_data();
    let path = write_export(&data, &config.export_dir)?;

    println!("✓ Wrote {} rows to {}", data.total_records(), path.display());
    println!("✓ Fingerprint: {}", data.fingerprint());
    Ok(())
}

fn run_validate(cache: &SampleDataCache) -> Result<()> {
    println!("🔍 Validating base tables");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let data = cache.sample_data();
    let report = DataQualityEngine::new().validate(&data);

    for result in &report.validations {
        let mark = if result.passed { "✓" } else { "✗" };
        println!("{} {:<26} {}", mark, result.rule_name, result.message);
    }
    for issue in &report.issues {
        println!("\n[{}] {}: {}", issue.severity.as_str(), issue.table, issue.recommendation);
    }

    println!("\n{}", report.summary());
    if report.has_critical_issues() {
        bail!("base tables have critical data quality issues");
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(cache: &SampleDataCache, config: &DashboardConfig) -> Result<()> {
    let data = cache.sample_data();
    let mut app = ui::App::new(data, config);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_cache: &SampleDataCache, _config: &DashboardConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a view: hcris-dashboard show overview");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_subcommand() {
        let cli = Cli::try_parse_from(["hcris-dashboard"]).unwrap();
        assert!(cli.command.is_none());

        let config = cli.config();
        assert_eq!(config.view, View::Overview);
        assert_eq!(config.year, 2023);
    }

    #[test]
    fn test_show_with_year_and_json() {
        let cli = Cli::try_parse_from(["hcris-dashboard", "show", "contract-labor", "--year", "2021", "--json"])
            .unwrap();
        match &cli.command {
            Some(Command::Show { target, json }) => {
                assert_eq!(target, "contract-labor");
                assert!(*json);
            }
            _ => panic!("expected show"),
        }
        assert_eq!(cli.config().year, 2021);
    }

    #[test]
    fn test_export_out_dir() {
        let cli = Cli::try_parse_from(["hcris-dashboard", "export", "--out-dir", "/tmp/hcris"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Export)));
        assert_eq!(cli.config().export_dir, PathBuf::from("/tmp/hcris"));
    }

    #[test]
    fn test_unknown_view_flag_falls_back() {
        let cli = Cli::try_parse_from(["hcris-dashboard", "--view", "Nope"]).unwrap();
        assert_eq!(cli.config().view, View::Overview);
    }

    #[test]
    fn test_validate_passes_on_sample_data() {
        assert!(run_validate(&SampleDataCache::new()).is_ok());
    }
}
