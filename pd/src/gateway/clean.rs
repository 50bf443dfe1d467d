//! Repair of model output that should have been JSON
//!
//! Models wrap JSON in prose or markdown fences even when asked not to.
//! The rule: take everything from the earliest `{` or `[` to the latest `}`
//! or `]`. Without such a span, strip the fences and trim.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```json\n?|```").expect("valid fence regex"));

/// Extract the JSON-looking part of a model reply
///
/// Never fails; a reply with no JSON in it comes back trimmed and unfenced.
pub fn clean_json(raw: &str) -> String {
    let start = [raw.find('{'), raw.find('[')].into_iter().flatten().min();
    let end = [raw.rfind('}'), raw.rfind(']')].into_iter().flatten().max();

    if let (Some(start), Some(end)) = (start, end)
        && end > start
    {
        return raw[start..=end].to_string();
    }

    FENCE_RE.replace_all(raw, "").trim().to_string()
}
