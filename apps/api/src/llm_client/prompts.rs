// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Closing instruction for prompts whose reply is parsed with `json::parse_json_reply`.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY the JSON object, no other text.";

/// Substitutes `{name}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned, so a value that itself contains
/// `{name}` is kept verbatim. Braces that do not name a known placeholder
/// are left alone.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = tail.find('}').and_then(|end| {
            let key = &tail[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
