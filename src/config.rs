// src/config.rs
use crate::domain::DateWindow;
use crate::gis::DEFAULT_BASE_URL;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// About a century.
const MAX_WINDOW_MINUTES: i64 = 100 * 365 * 24 * 60;

#[derive(Parser, Debug)]
#[command(
    name = "summit-parcel-report",
    version,
    about = "Emails a report of recently modified Summit County, CO parcels"
)]
pub struct Cli {
    #[command(flatten)]
    pub gis: GisArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct GisArgs {
    /// MapServer root of the county parcel query service
    #[arg(long, global = true, env = "SUMMIT_GIS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Value of the SOURCE field to filter the modification log on
    #[arg(long, global = true, env = "SUMMIT_SOURCE_FLAG", default_value_t = 1)]
    pub source_flag: i64,

    /// Per-request timeout, in seconds
    #[arg(
        long,
        global = true,
        env = "SUMMIT_HTTP_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Where JSON snapshots are written
    #[arg(long, global = true, env = "SUMMIT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

impl GisArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch parcels modified in the window, then render and email the report
    Report(ReportArgs),
    /// Page through the whole modification log and save it as JSON
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Size of the look-back window, in minutes
    #[arg(
        long,
        env = "SUMMIT_WINDOW_MINUTES",
        default_value_t = 56_000,
        value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_MINUTES)
    )]
    pub minutes: i64,

    /// Build the report but don't send it
    #[arg(long)]
    pub no_email: bool,

    /// Save the raw modification log and the final report as JSON
    #[arg(long)]
    pub save_json: bool,

    /// Who receives the report
    #[arg(long, env = "REPORT_RECIPIENT")]
    pub recipient: Option<String>,

    #[arg(long, env = "BREVO_API_KEY", hide_env_values = true)]
    pub brevo_api_key: Option<String>,

    #[arg(long, env = "REPORT_SENDER_EMAIL")]
    pub sender_email: Option<String>,

    #[arg(long, env = "REPORT_SENDER_NAME", default_value = "Summit Parcel Report")]
    pub sender_name: String,
}

impl ReportArgs {
    pub fn window(&self, now: DateTime<Utc>) -> DateWindow {
        DateWindow::ending_at(now, self.minutes)
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Records requested per page
    #[arg(
        long,
        env = "SUMMIT_PAGE_SIZE",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub page_size: u64,

    /// Offset to begin at, e.g. where a halted dump stopped
    #[arg(long, default_value_t = 0)]
    pub start_offset: u64,
}
