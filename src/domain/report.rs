// src/domain/report.rs

use crate::domain::timestamp::ModDate;
use crate::domain::window::DateWindow;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Attribute bag as returned by the GIS service, passed through untouched.
pub type Attributes = serde_json::Map<String, Value>;

pub const DETAIL_URL_BASE: &str = "https://gis.summitcountyco.gov/map/DetailData.aspx?Schno=";

// Field names on the county layers.
pub const PPI_FIELD: &str = "PPI";
pub const MODDATE_FIELD: &str = "MODDATE";
pub const SCHEDULE_FIELD: &str = "Schedule";
pub const ADDRESS_FIELD: &str = "FullAdd";
pub const LIVING_SQFT_FIELD: &str = "SqeFtLiving";
pub const ACRES_FIELD: &str = "TotAcres";

/// One row of the modification log (layer 19).
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationRecord {
    pub ppi: String,
    pub modified: ModDate,
}

impl ModificationRecord {
    /// Returns `None` when the row carries no usable PPI.
    pub fn from_attributes(attrs: &Attributes) -> Option<Self> {
        let ppi = attrs.get(PPI_FIELD).and_then(value_text)?;
        Some(Self {
            ppi,
            modified: ModDate::from_value(attrs.get(MODDATE_FIELD)),
        })
    }
}

/// PPI -> modification date for a single run.
///
/// Keeps the PPIs in the order they were first seen. A PPI that shows up twice
/// keeps its first position, but its date is taken from the last occurrence.
#[derive(Debug, Default)]
pub struct ModificationIndex {
    ppis: Vec<String>,
    dates: HashMap<String, ModDate>,
}

impl ModificationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ModificationRecord) {
        if self.dates.insert(record.ppi.clone(), record.modified).is_none() {
            self.ppis.push(record.ppi);
        }
    }

    pub fn ppis(&self) -> &[String] {
        &self.ppis
    }

    pub fn resolve(&self, ppi: &str) -> Option<ModDate> {
        self.dates.get(ppi).copied()
    }

    pub fn len(&self) -> usize {
        self.ppis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ppis.is_empty()
    }
}

impl FromIterator<ModificationRecord> for ModificationIndex {
    fn from_iter<I: IntoIterator<Item = ModificationRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

/// A single property in the outgoing report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub url: Option<String>,
    pub schedule: Option<String>,
    pub address: Option<String>,
    pub living_sqft: Option<f64>,
    pub acres: Option<f64>,
    #[serde(rename = "full_attributes")]
    pub attributes: Attributes,
    #[serde(skip)]
    pub modified: ModDate,
}

impl ReportEntry {
    /// Builds an entry from an attribute-layer record, stamping `MODDATE` with
    /// the resolved date's display form.
    pub fn new(mut attributes: Attributes, modified: ModDate) -> Self {
        let schedule = attributes.get(SCHEDULE_FIELD).and_then(value_text);
        let url = schedule
            .as_deref()
            .map(|s| format!("{DETAIL_URL_BASE}{s}"));
        let address = attributes.get(ADDRESS_FIELD).and_then(value_text);
        let living_sqft = attributes.get(LIVING_SQFT_FIELD).and_then(Value::as_f64);
        let acres = attributes.get(ACRES_FIELD).and_then(Value::as_f64);

        attributes.insert(
            MODDATE_FIELD.to_string(),
            Value::String(modified.to_string()),
        );

        Self {
            url,
            schedule,
            address,
            living_sqft,
            acres,
            attributes,
            modified,
        }
    }

    pub fn ppi(&self) -> Option<String> {
        self.attributes.get(PPI_FIELD).and_then(value_text)
    }

    pub fn attr(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }
}

/// Orders entries most recent first. The sort is stable: entries with equal
/// dates keep their relative order, and undated entries go last.
pub fn sort_most_recent_first(entries: &mut [ReportEntry]) {
    entries.sort_by(|a, b| b.modified.sort_key().cmp(&a.modified.sort_key()));
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub modified: usize,
    pub enriched: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// The terminal output of the pipeline.
#[derive(Debug)]
pub struct Report {
    pub window: DateWindow,
    pub entries: Vec<ReportEntry>,
    pub summary: RunSummary,
}

/// Renders an identifier-like attribute as text. Whole numbers lose their
/// trailing `.0`; blanks count as missing.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    fn entry_at(label: &str, ms: Option<i64>) -> ReportEntry {
        let modified = ms.map(ModDate::from_millis).unwrap_or(ModDate::NotAvailable);
        ReportEntry::new(attrs(json!({ "PPI": label, "Schedule": label })), modified)
    }

    #[test]
    fn entry_derives_url_and_overwrites_moddate() {
        let raw = attrs(json!({
            "PPI": "P-100",
            "Schedule": 300123,
            "FullAdd": "12 MAIN ST|BRECKENRIDGE",
            "SqeFtLiving": 2100,
            "TotAcres": 0.25,
            "MODDATE": 12345,
            "NumBedRms": 3
        }));

        let entry = ReportEntry::new(raw, ModDate::from_millis(1_700_000_123_456));

        assert_eq!(entry.schedule.as_deref(), Some("300123"));
        assert_eq!(
            entry.url.as_deref(),
            Some("https://gis.summitcountyco.gov/map/DetailData.aspx?Schno=300123")
        );
        assert_eq!(entry.address.as_deref(), Some("12 MAIN ST|BRECKENRIDGE"));
        assert_eq!(entry.living_sqft, Some(2100.0));
        assert_eq!(entry.acres, Some(0.25));
        assert_eq!(entry.attr("MODDATE"), Some(&json!("2023-11-14 22:15:23")));
        assert_eq!(entry.attr("NumBedRms"), Some(&json!(3)));
        assert_eq!(entry.ppi().as_deref(), Some("P-100"));
    }

    #[test]
    fn entry_without_schedule_has_no_url() {
        let entry = ReportEntry::new(attrs(json!({ "PPI": "X" })), ModDate::NotAvailable);
        assert!(entry.url.is_none());
        assert_eq!(entry.attr("MODDATE"), Some(&json!("N/A")));
    }

    #[test]
    fn sort_is_descending_stable_and_puts_missing_last() {
        let mut entries = vec![
            entry_at("first-5", Some(5_000)),
            entry_at("three", Some(3_000)),
            entry_at("second-5", Some(5_000)),
            entry_at("none", None),
        ];
        // Put the undated entry first to prove position does not matter.
        entries.rotate_right(1);

        sort_most_recent_first(&mut entries);

        let order: Vec<_> = entries.iter().map(|e| e.ppi().unwrap()).collect();
        assert_eq!(order, ["first-5", "second-5", "three", "none"]);
    }

    #[test]
    fn invalid_dates_sort_with_missing_dates() {
        let mut entries = vec![
            ReportEntry::new(attrs(json!({ "PPI": "bad" })), ModDate::Invalid),
            entry_at("missing", None),
            entry_at("dated", Some(1_000)),
        ];

        sort_most_recent_first(&mut entries);

        let order: Vec<_> = entries.iter().map(|e| e.ppi().unwrap()).collect();
        assert_eq!(order, ["dated", "bad", "missing"]);
    }

    #[test]
    fn index_keeps_first_position_and_last_date() {
        let record = |ppi: &str, ms: i64| ModificationRecord {
            ppi: ppi.into(),
            modified: ModDate::from_millis(ms),
        };
        let index: ModificationIndex = [record("A", 1_000), record("B", 2_000), record("A", 9_000)]
            .into_iter()
            .collect();

        assert_eq!(index.ppis(), ["A", "B"]);
        assert_eq!(index.resolve("A"), Some(ModDate::from_millis(9_000)));
        assert_eq!(index.resolve("C"), None);
    }

    #[test]
    fn modification_record_requires_ppi() {
        assert!(ModificationRecord::from_attributes(&attrs(json!({ "MODDATE": 1 }))).is_none());
        assert!(ModificationRecord::from_attributes(&attrs(json!({ "PPI": " " }))).is_none());

        let record =
            ModificationRecord::from_attributes(&attrs(json!({ "PPI": 42, "MODDATE": null })))
                .unwrap();
        assert_eq!(record.ppi, "42");
        assert_eq!(record.modified, ModDate::NotAvailable);
    }

    #[test]
    fn report_entry_serializes_with_full_attributes() {
        let entry = entry_at("S1", Some(0));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["full_attributes"]["MODDATE"], json!("1970-01-01 00:00:00"));
        assert!(json.get("modified").is_none());
    }
}
