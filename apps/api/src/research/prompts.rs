// All LLM prompt constants for the research module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{
    render_template, ANTI_FABRICATION_INSTRUCTION, JSON_ONLY_SYSTEM,
};
use crate::models::request::ResearchSubject;

/// System prompt template. Replace `{vc_firm_name}` and `{json_only}`.
pub const RESEARCH_SYSTEM_TEMPLATE: &str = r#"You are a venture capital research analyst with access to real-time web search.

ABSOLUTE REQUIREMENTS:
1. ONLY research the EXACT firm: "{vc_firm_name}"
2. Use web search to verify ALL information
3. NEVER include information about other VC firms (Andreessen Horowitz, Sequoia Capital, etc.)
4. If you cannot find verified information, return "Information not publicly available"
5. NEVER fabricate partner names, investments, or news articles
6. Every fact MUST have a citation from web search
7. Empty sections are better than fake information

FIRM VALIDATION: You are researching "{vc_firm_name}". If you find information about a different firm, DO NOT include it.

{json_only}"#;

/// Contact-research block, included only when the user named a contact.
/// Replace `{contact_name}` and `{vc_firm_name}`.
pub const CONTACT_SECTION_TEMPLATE: &str = r#"

SPECIAL FOCUS: The user will be meeting with "{contact_name}" from {vc_firm_name}. Please:
- Include this contact in the keyContacts section with isUserContact: true
- Research this specific person's background, investment focus, and experience
- If limited information is available about this contact, indicate this clearly
- Provide insights on how to best prepare for a meeting with this specific person"#;

/// Research prompt template.
/// Replace: {vc_firm_name}, {company_name}, {contact_section}, {anti_fabrication}
pub const RESEARCH_PROMPT_TEMPLATE: &str = r#"You are a venture capital research analyst. You MUST use web search to find ONLY verified, factual information about the specific VC firm requested.

RESEARCH GUIDELINES:
- Search for the EXACT firm name: "{vc_firm_name}" and do NOT confuse it with other VC firms
- Verify all partner names through the firm's official website or LinkedIn
- Only include investments that are specifically attributed to "{vc_firm_name}"
- Focus on information from the last 12 months for news and recent investments
- For competitive analysis, focus on direct product/service overlap with {company_name}'s business model
- ALWAYS provide citations for every piece of information

{anti_fabrication}

Research the VC firm "{vc_firm_name}" and provide a comprehensive analysis for "{company_name}", who is preparing for investor meetings.{contact_section}

IMPORTANT: All data must be about "{vc_firm_name}" only. Do not confuse it with firms like Andreessen Horowitz, Sequoia Capital, or any other VC firm.

Return a JSON object with this EXACT structure:

{
  "firmProfile": {
    "name": "Exact firm name (properly capitalized)",
    "description": "Description of the firm's investment philosophy",
    "founded": "Year founded",
    "location": "Primary location",
    "website": "Official website URL",
    "focusAreas": ["Specific investment focus areas"],
    "typicalInvestmentSize": "Investment range",
    "stage": ["Investment stages they focus on"],
    "notableInvestments": [
      {
        "companyName": "Portfolio company name",
        "amount": "Investment amount if known",
        "date": "YYYY-MM-DD",
        "round": "Series A/B/Seed etc",
        "description": "Brief description",
        "exitStatus": "Public/Acquired/Private",
        "exitValue": "Exit valuation or acquisition price if known"
      }
    ],
    "keyContacts": [
      {
        "name": "Contact name",
        "title": "Contact title",
        "focusArea": "Focus area most relevant to {company_name}",
        "experience": "Brief background and expertise",
        "relevanceReason": "Why this contact is relevant to {company_name}'s sector and stage",
        "isUserContact": false,
        "contactInfo": "Email or LinkedIn if publicly available"
      }
    ]
  },
  "recentNews": [
    {
      "title": "ONLY real news headlines",
      "source": "Actual news source (TechCrunch, Forbes, etc.)",
      "date": "YYYY-MM-DD",
      "url": "ONLY include if found in search results",
      "summary": "Brief factual summary"
    }
  ],
  "recentInvestments": [
    {
      "companyName": "Portfolio company name (last 12 months)",
      "amount": "Investment amount",
      "date": "YYYY-MM-DD",
      "round": "Series A/B/Seed etc",
      "description": "Why this investment is relevant to {company_name}"
    }
  ],
  "competitiveAnalysis": [
    {
      "companyName": "Portfolio company name",
      "similarity": "High/Medium/Low",
      "reasoning": "Direct product/service overlap with {company_name}'s business model",
      "potentialConcerns": ["Specific competitive or partnership risks"]
    }
  ],
  "alternativeVCs": [
    {
      "name": "Alternative VC firm name",
      "reasoning": "Why they might be a better fit for {company_name}",
      "focusAlignment": "How their thesis aligns with {company_name}'s business model and stage",
      "contactInfo": "Key partner and contact information if publicly available"
    }
  ],
  "sources": ["Every source and citation used in this research"]
}

COMPETITIVE ANALYSIS CRITERIA:
Only flag portfolio companies with NARROW, SPECIFIC overlap with {company_name}: the same type of product, similar technology, the same customer segments, feature-level competition, or conflicting distribution channels. Do NOT flag companies just because they are "enterprise software" or "B2B SaaS".

ALTERNATIVE VC CRITERIA:
Prioritize firms that invested in similar-stage companies in the last 18 months, show active interest in {company_name}'s sector, have complementary (not competing) portfolio companies, and have partners with relevant expertise.

ABSOLUTE PRIORITY: Accuracy over completeness. Return empty arrays or "Information not publicly available" rather than placeholder names, fake companies, or invented amounts."#;

/// The two messages sent to the provider for one research request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchPrompt {
    pub system: String,
    pub user: String,
}

/// Builds the system and user prompts for a research subject.
/// Pure string assembly; names are embedded verbatim.
pub fn build_research_prompt(subject: &ResearchSubject) -> ResearchPrompt {
    let firm = subject.firm_name.as_str();
    let company = subject.company_name.as_str();

    let contact_section = subject
        .contact_name
        .as_deref()
        .map(|contact| {
            render_template(
                CONTACT_SECTION_TEMPLATE,
                &[("contact_name", contact), ("vc_firm_name", firm)],
            )
        })
        .unwrap_or_default();

    let user = render_template(
        RESEARCH_PROMPT_TEMPLATE,
        &[
            ("vc_firm_name", firm),
            ("company_name", company),
            ("contact_section", &contact_section),
            ("anti_fabrication", ANTI_FABRICATION_INSTRUCTION),
        ],
    );

    let system = render_template(
        RESEARCH_SYSTEM_TEMPLATE,
        &[("vc_firm_name", firm), ("json_only", JSON_ONLY_SYSTEM)],
    );

    ResearchPrompt { system, user }
}
