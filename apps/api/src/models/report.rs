//! Research report wire types.
//!
//! `ResearchFindings` is what the model (or the fallback generator) produces.
//! `ResearchReport` is what the API returns: the findings plus the
//! server-assigned `generatedAt` stamp and provenance. A `generatedAt` field
//! inside model output is never read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Any JSON scalar a model might put where the schema wants text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// `null` reads as the type's default, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text field that also takes `null` (as empty) and numbers or booleans
/// (as their display form), e.g. `"founded": 2012`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotableInvestment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub round: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyContact {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub focus_area: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub experience: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub relevance_reason: Option<String>,
    /// True for the person the user said they are meeting.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_user_contact: bool,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmProfile {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Year as text; models answer "Information not publicly available" often
    /// enough, and a bare `2012` is read as "2012".
    #[serde(default, deserialize_with = "lenient_string")]
    pub founded: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub focus_areas: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub typical_investment_size: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notable_investments: Vec<NotableInvestment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_contacts: Vec<KeyContact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
    /// YYYY-MM-DD
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub round: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// How closely a portfolio company overlaps with the user's company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Similarity {
    High,
    #[default]
    Medium,
    Low,
}

/// Case-insensitive read of a model's similarity rating. Missing, `null`, or
/// unrecognised ratings become `Medium` instead of failing the whole report.
fn lenient_similarity<'de, D>(deserializer: D) -> Result<Similarity, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = lenient_opt_string(deserializer)?.unwrap_or_default();
    Ok(match rating.trim().to_lowercase().as_str() {
        "high" => Similarity::High,
        "low" => Similarity::Low,
        _ => Similarity::Medium,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorOverlap {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_similarity")]
    pub similarity: Similarity,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub potential_concerns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeVc {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub focus_alignment: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_info: Option<String>,
}

/// The research content of a report, as produced by the model or the fallback
/// generator. Every list defaults to empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchFindings {
    pub firm_profile: FirmProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_news: Vec<NewsItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_investments: Vec<Investment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub competitive_analysis: Vec<CompetitorOverlap>,
    #[serde(
        default,
        rename = "alternativeVCs",
        alias = "alternativeVcs",
        deserialize_with = "null_as_default"
    )]
    pub alternative_vcs: Vec<AlternativeVc>,
    /// The model's own citation list. Folded into `ReportSource::citations`.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Researched by the hosted provider and accepted by the validator.
    Live,
    /// Templated by the fallback generator. Not factual.
    Illustrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSource {
    pub mode: ReportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub citations: Vec<String>,
}

impl ReportSource {
    pub fn illustrative() -> Self {
        Self {
            mode: ReportMode::Illustrative,
            provider: None,
            model: None,
            citations: Vec::new(),
        }
    }

    /// Provenance for an accepted live answer. Provider citations come first,
    /// then any additional sources the model listed; duplicates are dropped.
    pub fn live(
        provider: &str,
        model: &str,
        provider_citations: Vec<String>,
        model_sources: Vec<String>,
    ) -> Self {
        let mut citations: Vec<String> = Vec::new();
        for citation in provider_citations.into_iter().chain(model_sources) {
            let citation = citation.trim().to_string();
            if !citation.is_empty() && !citations.contains(&citation) {
                citations.push(citation);
            }
        }

        Self {
            mode: ReportMode::Live,
            provider: Some(provider.to_string()),
            model: Some(model.to_string()),
            citations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchReport {
    #[serde(flatten)]
    pub findings: ResearchFindings,
    pub generated_at: DateTime<Utc>,
    pub source: ReportSource,
}

impl ResearchReport {
    /// Stamps findings with the server clock.
    pub fn stamp(findings: ResearchFindings, source: ReportSource) -> Self {
        Self {
            findings,
            generated_at: Utc::now(),
            source,
        }
    }
}
