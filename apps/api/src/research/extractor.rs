//! Response Extractor: pulls the JSON payload out of free-form model output.
//!
//! Models routinely wrap the requested JSON in prose or code fences. The
//! primary strategy is the greedy span from the first `{` to the last `}`.
//! When that span does not parse (prose after the payload that itself
//! contains braces, for example), a string-aware balanced-brace scan from the
//! first `{` is tried before giving up.

use serde_json::Value;
use thiserror::Error;

use crate::models::report::ResearchFindings;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No JSON object found in model response")]
    NoJsonObject,

    #[error("Model response JSON did not parse: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Model response JSON does not match the report schema: {0}")]
    SchemaMismatch(#[source] serde_json::Error),
}

/// Greedy span from the first `{` to the last `}`, inclusive.
fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// The first balanced `{...}` object, ignoring braces inside JSON strings.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Locates and parses the first top-level JSON object in `text`.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractError> {
    let greedy = greedy_span(text).ok_or(ExtractError::NoJsonObject)?;

    let greedy_error = match serde_json::from_str::<Value>(greedy) {
        Ok(value @ Value::Object(_)) => return Ok(value),
        Ok(_) => return Err(ExtractError::NoJsonObject),
        Err(e) => e,
    };

    match balanced_span(text).map(|span| serde_json::from_str::<Value>(span)) {
        Some(Ok(value @ Value::Object(_))) => Ok(value),
        _ => Err(ExtractError::InvalidJson(greedy_error)),
    }
}

/// Extracts the JSON object and reads it as research findings.
pub fn extract_findings(text: &str) -> Result<ResearchFindings, ExtractError> {
    let value = extract_json_object(text)?;
    serde_json::from_value(value).map_err(ExtractError::SchemaMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_surrounded_by_prose_is_returned_unmodified() {
        let text = r#"Here is the research you asked for:
{"firmProfile": {"name": "Acme Ventures", "focusAreas": ["AI", "Fintech"]}, "recentNews": []}
Let me know if you need anything else."#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(
            value,
            json!({
                "firmProfile": {"name": "Acme Ventures", "focusAreas": ["AI", "Fintech"]},
                "recentNews": []
            })
        );
    }

    #[test]
    fn test_code_fenced_object_is_extracted() {
        let text = "```json\n{\"firmProfile\": {\"name\": \"Acme Ventures\"}}\n```";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["firmProfile"]["name"], "Acme Ventures");
    }

    #[test]
    fn test_text_without_braces_is_malformed() {
        let err = extract_json_object("I could not find anything about that firm.").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonObject));
    }

    #[test]
    fn test_closing_brace_before_opening_is_malformed() {
        let err = extract_json_object("} nothing here {").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonObject));
    }

    #[test]
    fn test_unparseable_span_is_invalid_json() {
        let err = extract_json_object("{firmProfile: name = Acme}").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[test]
    fn test_trailing_braced_prose_falls_back_to_balanced_scan() {
        let text =
            r#"{"firmProfile": {"name": "Acme Ventures"}} Note: fields marked {n/a} were not found."#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["firmProfile"]["name"], "Acme Ventures");
    }

    #[test]
    fn test_balanced_scan_ignores_braces_inside_strings() {
        let text = r#"{"firmProfile": {"name": "Acme {Fund} Ventures"}} trailing }"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["firmProfile"]["name"], "Acme {Fund} Ventures");
    }

    #[test]
    fn test_extract_findings_reads_schema() {
        let text = r#"Result: {"firmProfile": {"name": "Acme Ventures"}, "recentInvestments": [
            {"companyName": "DataFlow AI", "amount": "$5M", "date": "2024-12-01", "round": "Series A", "description": "Analytics"}
        ]}"#;
        let findings = extract_findings(text).unwrap();
        assert_eq!(findings.firm_profile.name, "Acme Ventures");
        assert_eq!(findings.recent_investments.len(), 1);
        assert!(findings.recent_news.is_empty());
    }

    #[test]
    fn test_extract_findings_tolerates_nulls_and_numbers() {
        let text = r#"Here you go:
{"firmProfile": {"name": "Acme Ventures", "founded": 2012, "keyContacts": null},
 "recentNews": null,
 "recentInvestments": [{"companyName": "DataFlow AI", "amount": null}]}"#;
        let findings = extract_findings(text).unwrap();
        assert_eq!(findings.firm_profile.founded, "2012");
        assert!(findings.firm_profile.key_contacts.is_empty());
        assert!(findings.recent_news.is_empty());
        assert_eq!(findings.recent_investments[0].amount, "");
    }

    #[test]
    fn test_extract_findings_without_firm_profile_is_schema_mismatch() {
        let err = extract_findings(r#"{"recentNews": []}"#).unwrap_err();
        assert!(matches!(err, ExtractError::SchemaMismatch(_)));
    }
}
