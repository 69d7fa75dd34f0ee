use crate::domain::Attributes;
use crate::gis::GisError;
use serde::{Deserialize, Serialize};

// ArcGIS REST `query` response
//  ├── features[]            (absent on error, may be empty)
//  │    └── attributes       { field: value, ... }
//  ├── error                 (only on failure)
//  │    ├── code
//  │    ├── message
//  │    └── details[]
//  └── ...                   (fields, spatialReference, exceededTransferLimit, ...)

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QueryResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceError>,

    // Everything else is kept so raw snapshots stay faithful.
    #[serde(flatten)]
    pub rest: Attributes,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl QueryResponse {
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features: Some(features),
            ..Self::default()
        }
    }

    /// The result list, or the service error if one was reported. A missing
    /// `features` field counts as zero records.
    pub fn into_features(self) -> Result<Vec<Feature>, GisError> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        Ok(self.features.unwrap_or_default())
    }
}

impl From<ServiceError> for GisError {
    fn from(err: ServiceError) -> Self {
        let message = if err.details.is_empty() {
            err.message
        } else {
            format!("{} ({})", err.message, err.details.join("; "))
        };
        GisError::Service {
            code: err.code,
            message,
        }
    }
}

impl From<Attributes> for Feature {
    fn from(attributes: Attributes) -> Self {
        Self { attributes }
    }
}
