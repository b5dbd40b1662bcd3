//! Generation request/response contract and the persisted document shape.

use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Id returned when the generation could not be persisted.
pub const NOT_PERSISTED_ID: &str = "no-db";

/// Separator between variants in the stored `result` field.
const RESULT_SEPARATOR: &str = "\n\n";

/// Prompt shown for stored documents that have none.
const UNTITLED_PROMPT: &str = "Untitled";

/// Inbound body of `POST /api/generate`.
///
/// `tone`, `sentiment` and `length` are open vocabularies: unknown values are
/// accepted here and resolved to defaults by the composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GenerationRequest {
    /// User prompt for generation.
    pub prompt: String,

    /// Professional, Playful, Formal, Casual, ...
    pub tone: String,

    /// Positive, Neutral, Urgent, ...
    pub sentiment: String,

    /// Short | Medium | Long.
    #[serde(default = "default_length")]
    pub length: String,

    #[serde(default = "default_creativity")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub creativity: f64,

    #[serde(default = "default_variants")]
    #[validate(range(min = 1, max = 5))]
    pub variants: i64,
}

fn default_length() -> String {
    "Medium".to_string()
}

fn default_creativity() -> f64 {
    0.35
}

fn default_variants() -> i64 {
    1
}

/// Response of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: String,
    pub outputs: Vec<String>,
}

/// A generation as written to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredGeneration {
    pub prompt: String,
    pub tone: String,
    pub sentiment: String,
    pub length: String,
    pub creativity: f64,
    pub variants: i64,
    pub result: String,

    /// Assigned by the persistence adapter at insertion time.
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl StoredGeneration {
    pub fn new(request: &GenerationRequest, outputs: &[String], created_at: DateTime<Utc>) -> Self {
        Self {
            prompt: request.prompt.clone(),
            tone: request.tone.clone(),
            sentiment: request.sentiment.clone(),
            length: request.length.clone(),
            creativity: request.creativity,
            variants: request.variants,
            result: outputs.join(RESULT_SEPARATOR),
            created_at,
        }
    }
}

/// Library preview entry returned by `GET /api/recent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentItem {
    pub id: String,
    pub prompt: String,
    pub created_at: Option<String>,
}

impl RecentItem {
    /// Placeholder entries served when the store cannot be read.
    pub fn fallback() -> Vec<RecentItem> {
        ["Product Launch Tweet", "Feature Update Email", "SEO Blog Outline"]
            .iter()
            .enumerate()
            .map(|(i, prompt)| RecentItem {
                id: format!("mock-{}", i + 1),
                prompt: prompt.to_string(),
                created_at: None,
            })
            .collect()
    }
}

/// Loose projection of a stored document, tolerant of documents written by
/// other clients (missing fields, non-ObjectId ids).
#[derive(Debug, Clone, Deserialize)]
pub struct StoredGenerationSummary {
    #[serde(rename = "_id", default)]
    pub id: Option<Bson>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub created_at: Option<Bson>,
}

impl From<StoredGenerationSummary> for RecentItem {
    fn from(doc: StoredGenerationSummary) -> Self {
        let id = match doc.id {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(Bson::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let created_at = match doc.created_at {
            Some(Bson::DateTime(dt)) => Some(dt.to_chrono().to_rfc3339()),
            Some(Bson::String(s)) => Some(s),
            _ => None,
        };

        RecentItem {
            id,
            prompt: doc.prompt.unwrap_or_else(|| UNTITLED_PROMPT.to_string()),
            created_at,
        }
    }
}

/// Render an inserted id the way clients see it.
pub fn render_inserted_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fresh ObjectId for stores that assign ids themselves.
pub fn new_object_id() -> String {
    ObjectId::new().to_hex()
}
