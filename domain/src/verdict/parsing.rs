//! Judge response parsing.
//!
//! Judges are instructed to answer with strict JSON, but in practice wrap it
//! in prose or markdown fences. The repair policy here is deliberate
//! compatibility behavior, not incidental parsing: extract the first
//! balanced `{...}` span, parse it, and normalize via
//! [`Verdict::from_raw`]. Callers fall back to latency ordering when this
//! returns `None`.

use super::{RawVerdict, Verdict};
use crate::provider::ProviderId;

/// Extract the first balanced `{...}` span from free-form text.
///
/// Tracks brace depth outside of JSON string literals so braces inside
/// quoted reasoning text do not unbalance the scan.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse raw judge text into a normalized [`Verdict`].
///
/// Returns `None` on total parse failure: no JSON object extractable, the
/// JSON does not deserialize, or the `rankings` field is absent/not a
/// sequence.
pub fn parse_judge_response(text: &str, candidates: &[ProviderId]) -> Option<Verdict> {
    let json = extract_json_object(text)?;
    let raw: RawVerdict = serde_json::from_str(json).ok()?;
    Verdict::from_raw(raw, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: [ProviderId; 2] = [ProviderId::OpenAi, ProviderId::Anthropic];

    #[test]
    fn test_extract_plain_object() {
        let text = r#"{"winner": "openai"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_object_surrounded_by_prose() {
        let text = "Sure! Here is my evaluation:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope that helps.";
        assert_eq!(extract_json_object(text), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_extract_ignores_braces_inside_strings() {
        let text = r#"{"reasoning": "use {braces} carefully \" ok", "x": 1} trailing"#;
        let extracted = extract_json_object(text).unwrap();
        assert!(extracted.ends_with("\"x\": 1}"));
        assert!(serde_json::from_str::<serde_json::Value>(extracted).is_ok());
    }

    #[test]
    fn test_extract_unbalanced_is_none() {
        assert_eq!(extract_json_object("{\"oops\": "), None);
        assert_eq!(extract_json_object("no json here"), None);
    }

    #[test]
    fn test_parse_full_judge_response() {
        let text = r#"After careful evaluation:
{
  "winner": "openai",
  "reasoning": "**OPENAI** was more accurate.",
  "rankings": [
    {"provider": "openai", "rank": 1, "score": 8.5},
    {"provider": "anthropic", "rank": 2, "score": 7.2}
  ]
}"#;
        let verdict = parse_judge_response(text, &CANDIDATES).unwrap();
        assert_eq!(verdict.winner, ProviderId::OpenAi);
        assert_eq!(verdict.rankings.len(), 2);
        assert!(verdict.has_dense_ranks());
    }

    #[test]
    fn test_parse_without_rankings_fails() {
        let text = r#"{"winner": "openai", "reasoning": "best"}"#;
        assert!(parse_judge_response(text, &CANDIDATES).is_none());
    }

    #[test]
    fn test_parse_non_json_fails() {
        assert!(parse_judge_response("I refuse to answer in JSON.", &CANDIDATES).is_none());
    }

    #[test]
    fn test_parse_rankings_wrong_type_fails() {
        let text = r#"{"winner": "openai", "rankings": "openai first"}"#;
        assert!(parse_judge_response(text, &CANDIDATES).is_none());
    }
}
