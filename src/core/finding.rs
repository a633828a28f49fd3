use serde::{Deserialize, Serialize};

/// A flattened, display-ready record derived from one result of a validated
/// specification artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub status: String,
    pub qa_category: String,
    pub measurement: String,
    pub evidence_id: String,
    pub message: String,
}
