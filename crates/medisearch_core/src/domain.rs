//! crates/medisearch_core/src/domain.rs
//!
//! Defines the records exchanged with the medical search backend.
//! The gateway forwards these verbatim; only the client decodes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

//=========================================================================================
// Accounts
//=========================================================================================

/// Login input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// An account as reported by the backend. Owned by the backend, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// The bearer token issued at login. The only state this tier owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

//=========================================================================================
// Search Filters (closed structure)
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Pubmed,
    Medline,
    ClinicalTrial,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StudyType {
    Rct,
    MetaAnalysis,
    Cohort,
    CaseControl,
    CrossSectional,
    All,
}

/// Publication window. Bounds are `YYYY` or `YYYY-MM-DD`, interpreted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_types: Option<Vec<SourceType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_types: Option<Vec<StudyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sample_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_terms: Option<Vec<String>>,
}

//=========================================================================================
// Search
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
            filters: None,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = Some(filters);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEvidence {
    pub paper_id: String,
    pub title: String,
    /// In `[0, 1]`.
    pub relevance_score: f64,
    pub chunk_text: String,
    pub source: String,
    /// Whatever the index stored for the paper. Values are usually scalars
    /// (`mesh_terms` is often one `;`-joined string), but nothing is assumed.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalValidation {
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub flags: Vec<String>,
    pub clinical_relevance: f64,
    #[serde(default)]
    pub safety_concerns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalValidation {
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub flags: Vec<String>,
    pub statistical_score: f64,
    #[serde(default)]
    pub methodology_notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContradictionLevel {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionAnalysis {
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub flags: Vec<String>,
    pub contradiction_level: ContradictionLevel,
    #[serde(default)]
    pub conflicting_sources: Vec<String>,
}

/// The three reviewer verdicts plus the combined confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAgentValidation {
    pub clinical_expert: ClinicalValidation,
    pub statistical_validator: StatisticalValidation,
    pub contradiction_detector: ContradictionAnalysis,
    pub overall_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    /// Markdown.
    pub answer: String,
    pub sources: Vec<SourceEvidence>,
    pub validation: MultiAgentValidation,
    pub processing_time_ms: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Present when the backend saved the search for a signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_id: Option<String>,
}

//=========================================================================================
// History
//=========================================================================================

/// A summarized history entry. Carries no raw sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub user_id: String,
    pub query: String,
    pub answer: String,
    pub sources_count: u32,
    pub overall_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub total: u64,
    pub searches: Vec<HistoryItem>,
}

/// A full saved search, as returned by the history detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user_id: String,
    pub query: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceEvidence>,
    pub validation: MultiAgentValidation,
    pub sources_count: u32,
    pub overall_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    pub processing_time_ms: f64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Compare & Citations
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub search_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub search_id: String,
    pub query: String,
    pub answer: String,
    pub overall_confidence: f64,
    pub sources_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub comparisons: Vec<Comparison>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CitationFormat {
    Bibtex,
    Apa,
    Json,
}

impl CitationFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            CitationFormat::Bibtex => "bibtex",
            CitationFormat::Apa => "apa",
            CitationFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for CitationFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bibtex" => Ok(CitationFormat::Bibtex),
            "apa" => Ok(CitationFormat::Apa),
            "json" => Ok(CitationFormat::Json),
            _ => Err(()),
        }
    }
}

/// Paper ids take the form `<search_id>:<paper_id>`; the backend resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRequest {
    pub paper_ids: Vec<String>,
    pub format: CitationFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationResponse {
    pub format: String,
    pub citations: String,
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFlags {
    pub chromadb: bool,
    pub groq_api: bool,
    pub embedding_model: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: HealthStatus,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub services: ServiceFlags,
}

impl HealthCheck {
    /// Version reported when the backend could not be asked.
    pub const FALLBACK_VERSION: &'static str = "1.0.0";

    /// The payload reported when the backend cannot be reached at all.
    pub fn unreachable(at: DateTime<Utc>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            timestamp: at,
            version: Self::FALLBACK_VERSION.to_string(),
            services: ServiceFlags {
                chromadb: false,
                groq_api: false,
                embedding_model: false,
            },
        }
    }
}

//=========================================================================================
// Timestamps
//=========================================================================================

/// The backend emits both RFC 3339 and naive ISO-8601 datetimes (naive means UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }
}
