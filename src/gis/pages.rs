// src/gis/pages.rs
use crate::gis::{Feature, GisError, LayerQuery, QueryTransport};

/// Lazy, offset-ordered pages of a full layer dump.
///
/// Yields one `Ok(page)` per non-empty page. Iteration ends after the first
/// empty page, or right after yielding the first error. It never retries.
pub struct Pages<'a, T: QueryTransport + ?Sized> {
    transport: &'a T,
    query: LayerQuery,
    page_size: u64,
    next_offset: u64,
    done: bool,
}

impl<'a, T: QueryTransport + ?Sized> Pages<'a, T> {
    /// Starts at `offset`; 0 for a fresh dump, or where an earlier one halted.
    pub fn starting_at(transport: &'a T, source_flag: i64, page_size: u64, offset: u64) -> Self {
        Self {
            transport,
            query: LayerQuery::full_dump(source_flag, page_size),
            page_size,
            next_offset: offset,
            done: false,
        }
    }

    /// Offset of the page the next call will request.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }
}

impl<T: QueryTransport + ?Sized> Iterator for Pages<'_, T> {
    type Item = Result<Vec<Feature>, GisError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let query = self.query.at_offset(self.next_offset);
        match self.transport.query(&query).and_then(|r| r.into_features()) {
            Ok(features) if features.is_empty() => {
                tracing::debug!(offset = self.next_offset, "empty page, dump complete");
                self.done = true;
                None
            }
            Ok(features) => {
                self.next_offset += self.page_size;
                Some(Ok(features))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Everything a dump collected, plus the error that stopped it early, if any.
#[derive(Debug)]
pub struct FullDump {
    pub features: Vec<Feature>,
    pub pages: usize,
    pub halted: Option<GisError>,
    /// Where a follow-up dump should start. After a halt, the failed page.
    pub next_offset: u64,
}

/// Walks every page of the modification log for `source_flag`, beginning at
/// `start_offset`.
pub fn fetch_full_dump<T: QueryTransport + ?Sized>(
    transport: &T,
    source_flag: i64,
    page_size: u64,
    start_offset: u64,
) -> FullDump {
    let mut dump = FullDump {
        features: Vec::new(),
        pages: 0,
        halted: None,
        next_offset: start_offset,
    };

    let mut pages = Pages::starting_at(transport, source_flag, page_size, start_offset);
    while let Some(page) = pages.next() {
        match page {
            Ok(features) => {
                dump.pages += 1;
                dump.features.extend(features);
                tracing::info!(
                    page = dump.pages,
                    total = dump.features.len(),
                    "fetched dump page"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    pages = dump.pages,
                    resume_at = pages.next_offset(),
                    "dump halted"
                );
                dump.halted = Some(e);
            }
        }
    }

    dump.next_offset = pages.next_offset();
    dump
}
