use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CypherRequest {
    pub query: String,
    pub params: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CypherResponse {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<serde_json::Value>>,
}

/// Error body returned by the server on failed statements.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub exception: Option<String>,
}
