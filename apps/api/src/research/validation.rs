//! Response Validator. Cheap heuristics against the most common model
//! failure: answering about the wrong firm or borrowing another firm's people.
//!
//! Checks are pluggable `ResponseCheck` strategies run in order; the first
//! failure rejects the whole payload.

use thiserror::Error;

use crate::models::report::ResearchFindings;
use crate::models::request::ResearchSubject;

/// Large firms models substitute when they cannot find the requested one.
const FREQUENTLY_HALLUCINATED_FIRMS: &[&str] = &[
    "andreessen horowitz",
    "a16z",
    "sequoia",
    "kleiner perkins",
    "accel",
];

/// Celebrity partners that show up as invented contacts at unrelated firms.
const CELEBRITY_PARTNERS: &[&str] = &["marc andreessen", "ben horowitz"];

/// Email domains of other firms leaking into contact details.
const COMPETITOR_EMAIL_DOMAINS: &[&str] = &["@a16z.com", "@sequoiacap.com"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Model returned firm '{returned}' for requested firm '{requested}'")]
    FirmMismatch { requested: String, returned: String },

    #[error("Model returned frequently-hallucinated firm '{returned}' (matched '{pattern}')")]
    WrongFirm { returned: String, pattern: String },

    #[error("Model returned fabricated contacts: {}", .names.join(", "))]
    FabricatedContact { names: Vec<String> },
}

/// A single heuristic applied to parsed model output.
pub trait ResponseCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(
        &self,
        subject: &ResearchSubject,
        findings: &ResearchFindings,
    ) -> Result<(), ValidationError>;
}

/// Lowercased alphanumeric words of `text`.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether the word sequence `needle` occurs as a contiguous run in `haystack`.
fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle)
}

/// The returned firm name must contain the first word of the requested name.
///
/// Known to over-reject abbreviations ("a16z" for "Andreessen Horowitz") and
/// under-reject short common first words ("The ...").
pub struct FirmIdentityCheck;

impl ResponseCheck for FirmIdentityCheck {
    fn name(&self) -> &'static str {
        "firm_identity"
    }

    fn check(
        &self,
        subject: &ResearchSubject,
        findings: &ResearchFindings,
    ) -> Result<(), ValidationError> {
        let requested = subject.firm_name.to_lowercase();
        let returned = findings.firm_profile.name.to_lowercase();
        let first_token = requested.split_whitespace().next().unwrap_or_default();

        if returned.contains(first_token) {
            Ok(())
        } else {
            Err(ValidationError::FirmMismatch {
                requested: subject.firm_name.clone(),
                returned: findings.firm_profile.name.clone(),
            })
        }
    }
}

/// Rejects well-known firms the model tends to substitute, unless the user
/// asked for that firm.
pub struct KnownFirmBlocklist {
    /// Each pattern alongside its word form.
    patterns: Vec<(String, Vec<String>)>,
}

impl KnownFirmBlocklist {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|pattern| {
                    let pattern: String = pattern.into();
                    let tokens = words(&pattern);
                    (pattern, tokens)
                })
                .collect(),
        }
    }
}

impl Default for KnownFirmBlocklist {
    fn default() -> Self {
        Self::new(FREQUENTLY_HALLUCINATED_FIRMS.iter().copied())
    }
}

impl ResponseCheck for KnownFirmBlocklist {
    fn name(&self) -> &'static str {
        "known_firm_blocklist"
    }

    fn check(
        &self,
        subject: &ResearchSubject,
        findings: &ResearchFindings,
    ) -> Result<(), ValidationError> {
        let returned = &findings.firm_profile.name;
        let returned_words = words(returned);
        let requested_words = words(&subject.firm_name);

        let hit = self.patterns.iter().find(|(_, tokens)| {
            contains_phrase(&returned_words, tokens) && !contains_phrase(&requested_words, tokens)
        });

        match hit {
            Some((pattern, _)) => Err(ValidationError::WrongFirm {
                returned: returned.clone(),
                pattern: pattern.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Flags celebrity-partner names and competitor email domains in
/// `keyContacts`, regardless of the requested firm.
pub struct ContactFabricationCheck {
    names: Vec<String>,
    domains: Vec<String>,
}

impl Default for ContactFabricationCheck {
    fn default() -> Self {
        Self {
            names: CELEBRITY_PARTNERS.iter().map(|s| s.to_string()).collect(),
            domains: COMPETITOR_EMAIL_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ResponseCheck for ContactFabricationCheck {
    fn name(&self) -> &'static str {
        "contact_fabrication"
    }

    fn check(
        &self,
        _subject: &ResearchSubject,
        findings: &ResearchFindings,
    ) -> Result<(), ValidationError> {
        let suspicious: Vec<String> = findings
            .firm_profile
            .key_contacts
            .iter()
            .filter(|contact| {
                let name = contact.name.to_lowercase();
                let info = contact
                    .contact_info
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase();
                self.names.iter().any(|n| name.contains(n.as_str()))
                    || self.domains.iter().any(|d| info.contains(d.as_str()))
            })
            .map(|contact| contact.name.clone())
            .collect();

        if suspicious.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FabricatedContact { names: suspicious })
        }
    }
}

/// Ordered collection of checks.
pub struct ResponseValidator {
    checks: Vec<Box<dyn ResponseCheck>>,
}

impl ResponseValidator {
    pub fn new(checks: Vec<Box<dyn ResponseCheck>>) -> Self {
        Self { checks }
    }

    /// Appends a check to run after the existing ones.
    pub fn with_check(mut self, check: impl ResponseCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs every check in order, stopping at the first failure.
    pub fn validate(
        &self,
        subject: &ResearchSubject,
        findings: &ResearchFindings,
    ) -> Result<(), ValidationError> {
        for check in &self.checks {
            check.check(subject, findings).map_err(|e| {
                tracing::debug!("Check '{}' rejected model output", check.name());
                e
            })?;
        }
        Ok(())
    }
}

impl Default for ResponseValidator {
    /// Blocklist runs before the identity check so a substituted big-name
    /// firm is reported as `WrongFirm` rather than a plain mismatch.
    fn default() -> Self {
        Self::new(Vec::new())
            .with_check(KnownFirmBlocklist::default())
            .with_check(FirmIdentityCheck)
            .with_check(ContactFabricationCheck::default())
    }
}
