// src/gis/client.rs
use crate::gis::{GisError, LayerQuery, QueryResponse};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str =
    "https://gis.summitcountyco.gov/arcgis/rest/services/ParcelQueryTool/SummitMap1_Pro321/MapServer";

const USER_AGENT: &str = concat!("summit-parcel-report/", env!("CARGO_PKG_VERSION"));

/// Something that can answer a layer query. The pipeline only talks to this
/// trait, so tests can swap in canned responses.
pub trait QueryTransport {
    fn query(&self, query: &LayerQuery) -> Result<QueryResponse, GisError>;
}

pub struct GisClient {
    client: Client,
    base_url: String,
}

impl GisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GisError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GisError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl QueryTransport for GisClient {
    /// POSTs the query as a form body. Identifier lists can get long enough
    /// to overflow a GET URL.
    fn query(&self, query: &LayerQuery) -> Result<QueryResponse, GisError> {
        let endpoint = query.endpoint(&self.base_url)?;
        let url = query.url(&self.base_url)?;
        debug!(layer = query.layer, %url, "querying GIS layer");

        let resp = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(query.query_string())
            .send()
            .map_err(|e| GisError::Unreachable(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| GisError::Unreachable(e.to_string()))?;

        parse_response(status, text)
    }
}

/// Non-2xx is a `Status` error whatever the body says; a 2xx body must be JSON.
fn parse_response(status: StatusCode, body: String) -> Result<QueryResponse, GisError> {
    if !status.is_success() {
        return Err(GisError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| GisError::Unparseable(e.to_string()))
}
