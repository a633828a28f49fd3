use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A validated specification artifact as produced by an external validation
/// collaborator. The envelope carries more than this crate reads; unknown
/// fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSpec {
    pub body: ArtifactBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactBody {
    pub spec: SpecHeader,
    /// QA category name -> evidence key -> result. Both maps preserve the
    /// document order of the artifact.
    pub results: IndexMap<String, IndexMap<String, ResultRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecHeader {
    pub qa_categories: Vec<QaCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaCategory {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "type")]
    pub result_type: String,
    pub metadata: EvidenceMetadata,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceMetadata {
    pub measurement_type: String,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}
