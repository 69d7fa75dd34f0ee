mod client;
mod gis_error;
mod models;
pub mod pages;
pub mod query;

pub use client::{GisClient, QueryTransport, DEFAULT_BASE_URL};
pub use gis_error::GisError;
pub use models::{Feature, QueryResponse};
pub use pages::fetch_full_dump;
pub use query::LayerQuery;
