//! Research pipeline: the per-request state machine.
//!
//! Init → BuildPrompt → CallGateway (credential configured) or Fallback
//! CallGateway → Extract → Validate → Done
//! any provider-side failure → Fallback → Done
//!
//! Every path ends in a report. Malformed input is rejected before the
//! pipeline starts (see `ResearchRequest::validate`).

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::{Completion, CompletionProvider, LlmError};
use crate::models::report::{ReportSource, ResearchFindings, ResearchReport};
use crate::models::request::ResearchSubject;
use crate::research::extractor::{extract_findings, ExtractError};
use crate::research::fallback::generate_fallback;
use crate::research::prompts::{build_research_prompt, ResearchPrompt};
use crate::research::validation::{ResponseValidator, ValidationError};

/// Why the live path was abandoned. All variants are recoverable.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Gateway error: {0}")]
    Gateway(#[source] LlmError),

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] ExtractError),

    /// Firm mismatch, wrong firm, or fabricated contact.
    #[error("Rejected response: {0}")]
    Rejected(#[from] ValidationError),
}

impl From<LlmError> for ResearchError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => ResearchError::Configuration(err.to_string()),
            LlmError::EmptyContent => ResearchError::EmptyResponse,
            other => ResearchError::Gateway(other),
        }
    }
}

#[derive(Debug)]
enum ResearchStage {
    Init,
    BuildPrompt,
    CallGateway(ResearchPrompt),
    Extract(Completion),
    Validate {
        findings: ResearchFindings,
        citations: Vec<String>,
    },
    Fallback(ResearchError),
    Done(ResearchReport),
}

impl ResearchStage {
    fn name(&self) -> &'static str {
        match self {
            ResearchStage::Init => "init",
            ResearchStage::BuildPrompt => "build_prompt",
            ResearchStage::CallGateway(_) => "call_gateway",
            ResearchStage::Extract(_) => "extract",
            ResearchStage::Validate { .. } => "validate",
            ResearchStage::Fallback(_) => "fallback",
            ResearchStage::Done(_) => "done",
        }
    }
}

/// Runs one research request to completion.
///
/// Never fails: provider, parsing, and validation failures all resolve to the
/// illustrative report, and rejected model output is discarded whole.
pub async fn run_research(
    llm: &dyn CompletionProvider,
    validator: &ResponseValidator,
    subject: &ResearchSubject,
) -> ResearchReport {
    let mut stage = ResearchStage::Init;

    loop {
        debug!("Research stage: {}", stage.name());

        stage = match stage {
            ResearchStage::Init => ResearchStage::BuildPrompt,

            ResearchStage::BuildPrompt => {
                let prompt = build_research_prompt(subject);
                if llm.is_configured() {
                    ResearchStage::CallGateway(prompt)
                } else {
                    ResearchStage::Fallback(LlmError::MissingApiKey.into())
                }
            }

            ResearchStage::CallGateway(prompt) => {
                info!("Calling {} ({})", llm.provider_name(), llm.model());
                match llm.complete(&prompt.system, &prompt.user).await {
                    Ok(completion) => ResearchStage::Extract(completion),
                    Err(e) => ResearchStage::Fallback(e.into()),
                }
            }

            ResearchStage::Extract(completion) => match extract_findings(&completion.text) {
                Ok(findings) => ResearchStage::Validate {
                    findings,
                    citations: completion.citations,
                },
                Err(e) => ResearchStage::Fallback(e.into()),
            },

            ResearchStage::Validate {
                mut findings,
                citations,
            } => match validator.validate(subject, &findings) {
                Ok(()) => {
                    let sources = std::mem::take(&mut findings.sources);
                    let source =
                        ReportSource::live(llm.provider_name(), llm.model(), citations, sources);
                    info!(
                        "Live research accepted for '{}' ({} citations)",
                        findings.firm_profile.name,
                        source.citations.len()
                    );
                    ResearchStage::Done(ResearchReport::stamp(findings, source))
                }
                Err(e) => ResearchStage::Fallback(e.into()),
            },

            ResearchStage::Fallback(reason) => {
                match &reason {
                    ResearchError::Configuration(_) => {
                        info!("No research provider configured, using illustrative report")
                    }
                    other => warn!("Falling back to illustrative report: {other}"),
                }
                ResearchStage::Done(ResearchReport::stamp(
                    generate_fallback(subject),
                    ReportSource::illustrative(),
                ))
            }

            ResearchStage::Done(report) => return report,
        };
    }
}
