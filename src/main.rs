use crate::config::{Cli, Command, DumpArgs, GisArgs, ReportArgs};
use crate::domain::{DateWindow, Report};
use crate::errors::ReportError;
use crate::gis::{fetch_full_dump, GisClient, QueryResponse, QueryTransport};
use crate::mailer::{report_subject, BrevoMailer, MailerError, OutgoingReport};
use crate::pipeline::{Pipeline, PipelineOutcome};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod domain;
mod errors;
mod gis;
mod mailer;
mod pipeline;
mod snapshot;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "summit_parcel_report=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(error = %e, transport = e.is_transport(), "run failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ReportError> {
    let client = GisClient::new(cli.gis.base_url.clone(), cli.gis.timeout())?;

    match &cli.command {
        Command::Report(args) => run_report(&cli.gis, args, &client),
        Command::Dump(args) => run_dump(&cli.gis, args, &client),
    }
}

fn run_report<T: QueryTransport + ?Sized>(
    gis: &GisArgs,
    args: &ReportArgs,
    transport: &T,
) -> Result<(), ReportError> {
    // Fail on missing credentials before spending time on the GIS queries.
    let delivery = if args.no_email {
        None
    } else {
        let recipient = args
            .recipient
            .clone()
            .ok_or(MailerError::MissingCredentials("REPORT_RECIPIENT is not set"))?;
        let mailer = BrevoMailer::new(
            args.brevo_api_key.clone(),
            args.sender_email.clone(),
            args.sender_name.clone(),
            gis.timeout(),
        )?;
        Some((mailer, recipient))
    };

    let now = Utc::now();
    let window = args.window(now);
    info!(%window, minutes = args.minutes, "querying parcels modified in window");

    let save_dir = args.save_json.then_some(gis.output_dir.as_path());
    let Some(report) = build_report(transport, gis.source_flag, window, save_dir)? else {
        return Ok(());
    };

    let Some((mailer, recipient)) = delivery else {
        info!(properties = report.entries.len(), "email disabled, report not sent");
        return Ok(());
    };

    let subject = report_subject(report.entries.len());
    let outgoing = OutgoingReport {
        recipient: &recipient,
        subject: &subject,
        html: templates::report_page(&report, now).into_string(),
        text: templates::report_text(&report, now),
    };
    mailer.send_report(&outgoing)?;
    info!(%recipient, properties = report.entries.len(), "report emailed");

    Ok(())
}

/// Runs the pipeline and, when `save_dir` is set, snapshots its input and
/// output. Returns `None` when nothing changed inside the window.
fn build_report<T: QueryTransport + ?Sized>(
    transport: &T,
    source_flag: i64,
    window: DateWindow,
    save_dir: Option<&Path>,
) -> Result<Option<Report>, ReportError> {
    let pipeline = Pipeline::new(transport, source_flag);
    let fetched = pipeline.fetch_modifications(window)?;

    // Written before enrichment; a failed attribute fetch still leaves the
    // log rows on disk.
    if let Some(dir) = save_dir {
        snapshot::write_json(
            dir,
            &snapshot::modifications_filename(&window),
            &QueryResponse::with_features(fetched.rows().to_vec()),
        )?;
    }

    match pipeline.finish(fetched)? {
        PipelineOutcome::NothingToReport { window } => {
            info!(%window, "no parcels modified in window, nothing to report");
            Ok(None)
        }
        PipelineOutcome::Report(report) => {
            let summary = &report.summary;
            info!(
                modified = summary.modified,
                enriched = summary.enriched,
                resolved = summary.resolved,
                unresolved = summary.unresolved,
                "report assembled"
            );

            if let Some(dir) = save_dir {
                snapshot::write_json(dir, &snapshot::report_filename(&window), &report.entries)?;
            }
            Ok(Some(report))
        }
    }
}

fn run_dump<T: QueryTransport + ?Sized>(
    gis: &GisArgs,
    args: &DumpArgs,
    transport: &T,
) -> Result<(), ReportError> {
    let dump = fetch_full_dump(transport, gis.source_flag, args.page_size, args.start_offset);
    info!(
        pages = dump.pages,
        records = dump.features.len(),
        start_offset = args.start_offset,
        "dump finished"
    );

    // Whatever was collected is saved even if a page failed.
    snapshot::write_json(&gis.output_dir, snapshot::DUMP_FILENAME, &dump.features)?;

    match dump.halted {
        Some(source) => Err(ReportError::Dump {
            resume_at: dump.next_offset,
            source,
        }),
        None => Ok(()),
    }
}
