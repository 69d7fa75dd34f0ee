// src/pipeline.rs
//
// Fetch -> join -> sort. One run owns its PPI index from the primary fetch
// to the finished report; nothing is carried over between runs.

use crate::domain::report::{value_text, PPI_FIELD};
use crate::domain::{
    sort_most_recent_first, DateWindow, ModDate, ModificationIndex, ModificationRecord, Report,
    ReportEntry, RunSummary,
};
use crate::gis::{Feature, GisError, LayerQuery, QueryTransport};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Modifications,
    Attributes,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Modifications => write!(f, "modification-log fetch (layer 19)"),
            Stage::Attributes => write!(f, "attribute enrichment (layer 12)"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: GisError,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(GisError) -> Self {
        move |source| Self { stage, source }
    }
}

#[derive(Debug)]
pub enum PipelineOutcome {
    /// Nothing was modified inside the window. Not an error.
    NothingToReport { window: DateWindow },
    Report(Report),
}

/// State for a single run. Dropped when the run returns.
struct RunContext {
    window: DateWindow,
    index: ModificationIndex,
    summary: RunSummary,
}

/// The primary stage's result, handed back before enrichment runs so the
/// caller can look at (or save) the raw log rows first.
pub struct FetchedModifications {
    ctx: RunContext,
    rows: Vec<Feature>,
}

impl FetchedModifications {
    pub fn rows(&self) -> &[Feature] {
        &self.rows
    }
}

pub struct Pipeline<'a, T: QueryTransport + ?Sized> {
    transport: &'a T,
    source_flag: i64,
}

impl<'a, T: QueryTransport + ?Sized> Pipeline<'a, T> {
    pub fn new(transport: &'a T, source_flag: i64) -> Self {
        Self {
            transport,
            source_flag,
        }
    }

    pub fn run(&self, window: DateWindow) -> Result<PipelineOutcome, PipelineError> {
        let fetched = self.fetch_modifications(window)?;
        self.finish(fetched)
    }

    /// Primary stage: the modification log for the window, indexed by PPI.
    pub fn fetch_modifications(
        &self,
        window: DateWindow,
    ) -> Result<FetchedModifications, PipelineError> {
        let query = LayerQuery::modifications(self.source_flag, &window);
        let rows = self
            .transport
            .query(&query)
            .and_then(|r| r.into_features())
            .map_err(PipelineError::at(Stage::Modifications))?;

        let index = index_modifications(&rows);
        info!(
            %window,
            rows = rows.len(),
            ppis = index.len(),
            "fetched modification log"
        );

        let summary = RunSummary {
            modified: index.len(),
            ..RunSummary::default()
        };

        Ok(FetchedModifications {
            ctx: RunContext {
                window,
                index,
                summary,
            },
            rows,
        })
    }

    /// Enrichment and sort. An empty index ends the run without querying
    /// the attribute layer.
    pub fn finish(&self, fetched: FetchedModifications) -> Result<PipelineOutcome, PipelineError> {
        let FetchedModifications { mut ctx, .. } = fetched;

        if ctx.index.is_empty() {
            return Ok(PipelineOutcome::NothingToReport { window: ctx.window });
        }

        let attributes = self.fetch_attributes(ctx.index.ppis())?;
        let mut entries = enrich(attributes, &ctx.index, &mut ctx.summary);
        sort_most_recent_first(&mut entries);

        Ok(PipelineOutcome::Report(Report {
            window: ctx.window,
            entries,
            summary: ctx.summary,
        }))
    }

    fn fetch_attributes(&self, ppis: &[String]) -> Result<Vec<Feature>, PipelineError> {
        let query = LayerQuery::attributes(ppis);
        let features = self
            .transport
            .query(&query)
            .and_then(|r| r.into_features())
            .map_err(PipelineError::at(Stage::Attributes))?;

        info!(requested = ppis.len(), returned = features.len(), "fetched parcel attributes");
        Ok(features)
    }
}

/// Builds the PPI index from modification-log rows, skipping rows with no PPI.
pub fn index_modifications(features: &[Feature]) -> ModificationIndex {
    features
        .iter()
        .filter_map(|f| {
            let record = ModificationRecord::from_attributes(&f.attributes);
            if record.is_none() {
                warn!(attributes = ?f.attributes, "modification row without PPI, skipping");
            }
            record
        })
        .collect()
}

/// One entry per attribute record, in response order. Records whose PPI is not
/// in the index still get an entry, dated `N/A`.
pub fn enrich(
    features: Vec<Feature>,
    index: &ModificationIndex,
    summary: &mut RunSummary,
) -> Vec<ReportEntry> {
    features
        .into_iter()
        .map(|feature| {
            let ppi = feature.attributes.get(PPI_FIELD).and_then(value_text);

            let modified = match ppi.as_deref().and_then(|p| index.resolve(p)) {
                Some(date) => {
                    summary.resolved += 1;
                    date
                }
                None => {
                    debug!(ppi = ?ppi, "attribute record has no modification entry");
                    summary.unresolved += 1;
                    ModDate::NotAvailable
                }
            };

            summary.enriched += 1;
            ReportEntry::new(feature.attributes, modified)
        })
        .collect()
}
