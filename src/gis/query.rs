// src/gis/query.rs
//
// Where-clause builders and request descriptors for the county's ArcGIS
// MapServer. Everything here is pure; nothing touches the network.

use crate::domain::DateWindow;
use crate::gis::GisError;
use url::{form_urlencoded, Url};

/// Parcel modification log.
pub const MODIFICATION_LAYER: u32 = 19;
/// Parcel descriptive attributes.
pub const ATTRIBUTE_LAYER: u32 = 12;

const DATE_LITERAL: &str = "%Y-%m-%d";

pub const MODIFICATION_FIELDS: &[&str] = &[
    "OBJECTID", "PPI", "SOURCE", "MODDATE", "MODTYPE", "METHOD", "OPERATOR",
];

pub const ATTRIBUTE_FIELDS: &[&str] = &[
    "PPI",
    "Schedule",
    "Filing",
    "Phase",
    "ShortDesc",
    "HouseNum",
    "FullStreet",
    "StreetName",
    "TownName",
    "PostCode",
    "FullAdd",
    "TotAcres",
    "SquareFeet",
    "SqeFtLiving",
    "BsmtType",
    "GarageType",
    "NumOfCars",
    "GarSqFt",
    "NumOfRms",
    "NumBedRms",
    "NumLofts",
    "NumKitch",
    "MasterBath",
    "FullBath",
    "TotBath",
];

/// `SOURCE=<flag> AND MODDATE >= DATE 'start' AND MODDATE < DATE 'end + 1 day'`
///
/// `DATE 'x'` means midnight at the start of `x`, so the upper bound is the
/// following day for `end` itself to be covered.
pub fn modified_within(source_flag: i64, window: &DateWindow) -> String {
    let upper = match window.end.succ_opt() {
        Some(next) => format!("MODDATE < DATE '{}'", next.format(DATE_LITERAL)),
        None => format!("MODDATE <= DATE '{}'", window.end.format(DATE_LITERAL)),
    };
    format!(
        "SOURCE={source_flag} AND MODDATE >= DATE '{}' AND {upper}",
        window.start.format(DATE_LITERAL),
    )
}

/// `PPI IN ('A1','B2',...)`
pub fn ppi_in<S: AsRef<str>>(ppis: &[S]) -> String {
    let list = ppis
        .iter()
        .map(|ppi| quote_literal(ppi.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    format!("PPI IN ({list})")
}

/// Full-scan filter used by the dump mode.
pub fn source_only(source_flag: i64) -> String {
    format!("SOURCE={source_flag}")
}

/// SQL-92 string literal: single quotes, embedded quotes doubled.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Percent-encodes one parameter value for transport (`application/x-www-form-urlencoded`).
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Inverse of [`encode`].
#[cfg(test)]
pub fn decode(encoded: &str) -> String {
    form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(text, _)| text.into_owned())
        .unwrap_or_default()
}

/// A ready-to-send query against one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerQuery {
    pub layer: u32,
    pub where_clause: String,
    pub out_fields: Vec<String>,
    pub order_by: Option<String>,
    pub offset: Option<u64>,
    pub record_count: Option<u64>,
}

impl LayerQuery {
    fn new(layer: u32, where_clause: String, out_fields: &[&str]) -> Self {
        Self {
            layer,
            where_clause,
            out_fields: out_fields.iter().map(|f| f.to_string()).collect(),
            order_by: None,
            offset: None,
            record_count: None,
        }
    }

    /// Modification-log rows for one source flag inside a date window.
    pub fn modifications(source_flag: i64, window: &DateWindow) -> Self {
        let mut query = Self::new(
            MODIFICATION_LAYER,
            modified_within(source_flag, window),
            MODIFICATION_FIELDS,
        );
        query.order_by = Some("MODDATE".to_string());
        query
    }

    /// Attribute rows for exactly the given PPIs.
    pub fn attributes<S: AsRef<str>>(ppis: &[S]) -> Self {
        Self::new(ATTRIBUTE_LAYER, ppi_in(ppis), ATTRIBUTE_FIELDS)
    }

    /// First page of the full modification-log dump.
    pub fn full_dump(source_flag: i64, page_size: u64) -> Self {
        let mut query = Self::new(MODIFICATION_LAYER, source_only(source_flag), &["*"]);
        query.offset = Some(0);
        query.record_count = Some(page_size);
        query
    }

    pub fn at_offset(&self, offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..self.clone()
        }
    }

    /// Request parameters, unencoded, in a fixed order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("where", self.where_clause.clone()),
            ("outFields", self.out_fields.join(",")),
            ("returnGeometry", "false".to_string()),
        ];
        if let Some(order_by) = &self.order_by {
            params.push(("orderByFields", order_by.clone()));
        }
        if let Some(offset) = self.offset {
            params.push(("resultOffset", offset.to_string()));
        }
        if let Some(count) = self.record_count {
            params.push(("resultRecordCount", count.to_string()));
        }
        params.push(("f", "json".to_string()));
        params
    }

    /// The encoded form body / query string.
    pub fn query_string(&self) -> String {
        self.params()
            .iter()
            .map(|(key, value)| format!("{key}={}", encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `<base>/<layer>/query`
    pub fn endpoint(&self, base_url: &str) -> Result<Url, GisError> {
        let raw = format!("{}/{}/query", base_url.trim_end_matches('/'), self.layer);
        Url::parse(&raw).map_err(|e| GisError::InvalidQuery(format!("{raw}: {e}")))
    }

    /// Full GET URL, mostly useful for logging and for pasting into a browser.
    pub fn url(&self, base_url: &str) -> Result<Url, GisError> {
        let mut url = self.endpoint(base_url)?;
        url.set_query(Some(&self.query_string()));
        Ok(url)
    }
}
