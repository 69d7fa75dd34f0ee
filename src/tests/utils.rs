// src/tests/utils.rs
use crate::gis::{Feature, GisError, LayerQuery, QueryResponse, QueryTransport};
use serde_json::Value;
use std::cell::RefCell;

type Handler = Box<dyn Fn(&LayerQuery) -> Result<QueryResponse, GisError>>;

/// In-memory stand-in for the county GIS service. Records every query it sees.
pub struct MockTransport {
    handler: Handler,
    pub calls: RefCell<Vec<LayerQuery>>,
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&LayerQuery) -> Result<QueryResponse, GisError> + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls_to(&self, layer: u32) -> usize {
        self.calls.borrow().iter().filter(|q| q.layer == layer).count()
    }

    pub fn last_call_to(&self, layer: u32) -> Option<LayerQuery> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|q| q.layer == layer)
            .cloned()
    }
}

impl QueryTransport for MockTransport {
    fn query(&self, query: &LayerQuery) -> Result<QueryResponse, GisError> {
        self.calls.borrow_mut().push(query.clone());
        (self.handler)(query)
    }
}

/// `[{..attrs..}, ...]` -> features
pub fn features(rows: Value) -> Vec<Feature> {
    rows.as_array()
        .expect("rows must be a JSON array")
        .iter()
        .map(|row| Feature::from(row.as_object().cloned().expect("row must be an object")))
        .collect()
}

pub fn respond(rows: Value) -> Result<QueryResponse, GisError> {
    Ok(QueryResponse::with_features(features(rows)))
}
