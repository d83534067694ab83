//! Query request types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Message returned for any malformed query body
pub const MISSING_QUERY: &str = "Query parameter is required";

/// Body of `POST /query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's natural-language question
    pub query: String,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Parse and validate a raw request body
    ///
    /// Anything other than a JSON object with a non-blank string `query`
    /// is rejected before any external call is made.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| Error::validation(MISSING_QUERY))?;

        match value.get("query") {
            Some(Value::String(query)) if !query.trim().is_empty() => Ok(Self::new(query.clone())),
            _ => Err(Error::validation(MISSING_QUERY)),
        }
    }
}
