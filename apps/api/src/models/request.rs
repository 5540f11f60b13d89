use serde::Deserialize;

use crate::errors::AppError;

/// Body of `POST /api/research`. Every field is optional on the wire so that
/// missing fields produce a 400 naming them instead of a generic
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    #[serde(default)]
    pub vc_firm_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
}

/// A validated research request: trimmed, non-empty firm and company names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchSubject {
    pub firm_name: String,
    pub company_name: String,
    pub contact_name: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl ResearchSubject {
    pub fn new(
        firm_name: impl Into<String>,
        company_name: impl Into<String>,
        contact_name: Option<String>,
    ) -> Result<Self, AppError> {
        ResearchRequest {
            vc_firm_name: Some(firm_name.into()),
            company_name: Some(company_name.into()),
            contact_name,
        }
        .validate()
    }
}

impl ResearchRequest {
    /// Checks required fields. This is the only user-facing failure of the
    /// research endpoint.
    pub fn validate(self) -> Result<ResearchSubject, AppError> {
        let firm_name = non_blank(self.vc_firm_name);
        let company_name = non_blank(self.company_name);

        match (firm_name, company_name) {
            (Some(firm_name), Some(company_name)) => Ok(ResearchSubject {
                firm_name,
                company_name,
                contact_name: non_blank(self.contact_name),
            }),
            (firm_name, company_name) => {
                let mut missing = Vec::new();
                if firm_name.is_none() {
                    missing.push("vcFirmName");
                }
                if company_name.is_none() {
                    missing.push("companyName");
                }
                Err(AppError::Validation(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_is_trimmed() {
        let subject = ResearchRequest {
            vc_firm_name: Some("  Acme Ventures ".into()),
            company_name: Some("Widget Co\n".into()),
            contact_name: Some(" Jane Roe ".into()),
        }
        .validate()
        .unwrap();

        assert_eq!(subject.firm_name, "Acme Ventures");
        assert_eq!(subject.company_name, "Widget Co");
        assert_eq!(subject.contact_name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_blank_contact_becomes_none() {
        let subject =
            ResearchSubject::new("Acme Ventures", "Widget Co", Some("   ".into())).unwrap();
        assert_eq!(subject.contact_name, None);
    }

    #[test]
    fn test_empty_request_names_both_fields() {
        let msg = message(ResearchRequest::default().validate().unwrap_err());
        assert_eq!(msg, "Missing required fields: vcFirmName, companyName");
    }

    #[test]
    fn test_whitespace_company_is_missing() {
        let msg = message(
            ResearchRequest {
                vc_firm_name: Some("Acme Ventures".into()),
                company_name: Some("   ".into()),
                contact_name: None,
            }
            .validate()
            .unwrap_err(),
        );
        assert_eq!(msg, "Missing required fields: companyName");
    }
}
