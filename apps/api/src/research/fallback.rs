//! Fallback Generator: a deterministic, schema-complete report built only
//! from the request's names.
//!
//! Used when no provider credential is configured or when any step of the
//! live path fails. The content is templated and illustrative; the report's
//! `source.mode` marks it as such.

use crate::models::report::{
    AlternativeVc, CompetitorOverlap, FirmProfile, Investment, KeyContact, NewsItem,
    NotableInvestment, ResearchFindings, Similarity,
};
use crate::models::request::ResearchSubject;

const NOT_PUBLIC: &str = "Information not publicly available";

/// Capitalizes the first letter of each space-separated word and lowercases
/// the rest. Runs of spaces are preserved.
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `https://www.<firm name, lowercased, whitespace removed>.com`
fn placeholder_website(firm: &str) -> String {
    let host: String = firm
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    format!("https://www.{host}.com")
}

fn notable(
    company: &str,
    amount: &str,
    date: &str,
    round: &str,
    description: &str,
    exit_status: &str,
) -> NotableInvestment {
    NotableInvestment {
        company_name: company.to_string(),
        amount: amount.to_string(),
        date: date.to_string(),
        round: round.to_string(),
        description: description.to_string(),
        exit_status: Some(exit_status.to_string()),
        exit_value: None,
    }
}

fn investment(
    company: &str,
    amount: &str,
    date: &str,
    round: &str,
    description: &str,
) -> Investment {
    Investment {
        company_name: company.to_string(),
        amount: amount.to_string(),
        date: date.to_string(),
        round: round.to_string(),
        description: description.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Builds the illustrative findings for a subject. Pure: identical input
/// yields identical output.
pub fn generate_fallback(subject: &ResearchSubject) -> ResearchFindings {
    let firm = title_case(&subject.firm_name);
    let company = title_case(&subject.company_name);

    let key_contacts = subject
        .contact_name
        .as_deref()
        .map(|contact| KeyContact {
            name: title_case(contact),
            title: NOT_PUBLIC.to_string(),
            focus_area: NOT_PUBLIC.to_string(),
            experience: NOT_PUBLIC.to_string(),
            relevance_reason: Some(format!(
                "Your scheduled contact at {firm}. \
                Review their recent public activity before the meeting."
            )),
            is_user_contact: true,
            contact_info: None,
        })
        .into_iter()
        .collect();

    ResearchFindings {
        firm_profile: FirmProfile {
            name: firm.clone(),
            description: format!(
                "{firm} is a venture capital firm focused on early-stage technology investments. \
                This profile is illustrative and was not researched; configure a research provider \
                for verified information."
            ),
            founded: NOT_PUBLIC.to_string(),
            location: NOT_PUBLIC.to_string(),
            website: placeholder_website(&firm),
            focus_areas: strings(&[
                "SaaS",
                "AI/ML",
                "Fintech",
                "Enterprise Software",
                "Developer Tools",
            ]),
            typical_investment_size: "$1M - $10M".to_string(),
            stage: strings(&["Seed", "Series A", "Series B"]),
            notable_investments: vec![
                notable(
                    "Example Analytics",
                    "$2M",
                    "2019-03-01",
                    "Seed",
                    "Illustrative data analytics portfolio company",
                    "Private",
                ),
                notable(
                    "Example Payments",
                    "$6M",
                    "2020-09-01",
                    "Series A",
                    "Illustrative payments infrastructure portfolio company",
                    "Acquired",
                ),
                notable(
                    "Example DevTools",
                    "$4M",
                    "2022-05-01",
                    "Series A",
                    "Illustrative developer productivity portfolio company",
                    "Private",
                ),
            ],
            key_contacts,
        },
        recent_news: vec![
            NewsItem {
                title: format!("{firm} Announces New Early-Stage Fund"),
                source: "Illustrative".to_string(),
                date: "2024-12-15".to_string(),
                url: None,
                summary: format!(
                    "Placeholder headline showing where verified news about {firm} would appear."
                ),
            },
            NewsItem {
                title: format!("{firm} Leads Series A in Climate Tech Startup"),
                source: "Illustrative".to_string(),
                date: "2024-10-30".to_string(),
                url: None,
                summary: "Placeholder entry for recent deal coverage.".to_string(),
            },
        ],
        recent_investments: vec![
            investment(
                "DataFlow AI",
                "$5.2M",
                "2024-12-01",
                "Series A",
                "AI-powered data analytics platform for enterprise customers",
            ),
            investment(
                "SecureAuth Pro",
                "$3.1M",
                "2024-11-15",
                "Seed",
                "Authentication and security tooling for developers",
            ),
            investment(
                "CloudOps Suite",
                "$7.8M",
                "2024-10-20",
                "Series A",
                "DevOps automation platform for cloud-native applications",
            ),
        ],
        competitive_analysis: vec![
            CompetitorOverlap {
                company_name: "DataFlow AI".to_string(),
                similarity: Similarity::High,
                reasoning: format!(
                    "If {company} works in data or analytics, DataFlow AI may target the same enterprise customers."
                ),
                potential_concerns: strings(&[
                    "Direct competition for enterprise clients",
                    "Similar technology approach",
                ]),
            },
            CompetitorOverlap {
                company_name: "SecureAuth Pro".to_string(),
                similarity: Similarity::Medium,
                reasoning: format!(
                    "If {company} ships security features, there could be overlap with SecureAuth Pro."
                ),
                potential_concerns: strings(&[
                    "Overlapping security features",
                    "Competition for developer mindshare",
                ]),
            },
        ],
        alternative_vcs: vec![
            AlternativeVc {
                name: "Innovation Ventures".to_string(),
                reasoning: "Track record in similar-stage companies with a complementary portfolio"
                    .to_string(),
                focus_alignment: format!("Aligned with {company}'s sector and growth stage"),
                contact_info: None,
            },
            AlternativeVc {
                name: "TechForward Capital".to_string(),
                reasoning: "Known for hands-on support in enterprise software".to_string(),
                focus_alignment: "Fit for B2B software companies seeking strategic guidance"
                    .to_string(),
                contact_info: None,
            },
            AlternativeVc {
                name: "NextGen Partners".to_string(),
                reasoning: "Specializes in early-stage companies with strong technical teams"
                    .to_string(),
                focus_alignment: "Suited to technical founders looking for product support"
                    .to_string(),
                contact_info: None,
            },
        ],
        sources: Vec::new(),
    }
}
