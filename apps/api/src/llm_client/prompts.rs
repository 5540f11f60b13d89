// Shared prompt constants and prompt-building utilities.
// The research module defines its own templates in research/prompts.rs;
// this file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include explanations or apologies outside the JSON object.";

/// Common instruction appended to every research prompt.
pub const ANTI_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: You are STRICTLY FORBIDDEN from fabricating, inventing, or making up ANY information. \
    This is a professional tool used for real investor meetings. \
    NEVER fabricate news articles, headlines, investment amounts, dates, partner names, titles, \
    valuations, exit information, URLs, or portfolio companies. \
    ONLY use information found through web search with proper citations. \
    If you do not have verified information, state \"Information not publicly available\". \
    Empty arrays are BETTER than fabricated entries. \
    Only include URLs that appeared in your search results. \
    Dates must use the YYYY-MM-DD format.";

/// Fills `{key}` placeholders in a single left-to-right pass.
///
/// Substituted values are copied verbatim and never rescanned, so user input
/// that happens to contain `{key}` text cannot expand into other values.
/// Braces that do not name a known key (the JSON schema examples) are kept as-is.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let substitution = after_open.find('}').and_then(|close| {
            let key = &after_open[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
