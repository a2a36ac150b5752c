//! Recovery of JSON from free-text model replies.
//!
//! A reply is first parsed as-is. If that fails, the repair pipeline runs a
//! fixed sequence of text passes (`&str -> String`) and the result is parsed
//! once more. Pass order is fixed.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Both parse attempts failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reply is not JSON (direct: {direct}; repaired: {repaired})")]
pub struct Unparseable {
    pub direct: String,
    pub repaired: String,
}

/// Parse `raw` as JSON, falling back to the repaired text.
pub fn parse_model_json(raw: &str) -> Result<Value, Unparseable> {
    let direct = match serde_json::from_str(raw) {
        Ok(value) => return Ok(value),
        Err(e) => e.to_string(),
    };

    let cleaned = repair_text(raw);
    serde_json::from_str(&cleaned).map_err(|e| Unparseable {
        direct,
        repaired: e.to_string(),
    })
}

/// Run the full repair pipeline on raw model output.
pub fn repair_text(raw: &str) -> String {
    let mut result = strip_code_fences(raw);
    result = normalize_quotes(&result);
    result = remove_line_breaks(&result);
    result = collapse_whitespace(&result);
    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Markdown code fences
// ---------------------------------------------------------------------------

/// Remove ``` markers together with any language hint.
fn strip_code_fences(text: &str) -> String {
    static FENCE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("valid regex"));

    FENCE_RE.replace_all(text, "").to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Typographic quotes
// ---------------------------------------------------------------------------

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            other => other,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 3: Line breaks
// ---------------------------------------------------------------------------

fn remove_line_breaks(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

// ---------------------------------------------------------------------------
// Pass 4: Whitespace runs
// ---------------------------------------------------------------------------

fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text, " ").to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn valid_json_parses_directly() {
        let value = parse_model_json(r#"{"answer": "x"}"#).unwrap();
        assert_eq!(value, json!({"answer": "x"}));
    }

    #[test]
    fn fenced_json_is_repaired() {
        let value = parse_model_json("```json\n{\"answer\":\"x\"}\n```").unwrap();
        assert_eq!(value, json!({"answer": "x"}));
    }

    #[test]
    fn bare_fence_without_language_is_repaired() {
        let value = parse_model_json("```\n{\"answer\":\"x\"}\n```").unwrap();
        assert_eq!(value, json!({"answer": "x"}));
    }

    #[test]
    fn smart_quotes_are_repaired() {
        let raw = "{\u{201C}answer\u{201D}: \u{201C}Open Settings\u{201D}, \u{201C}confidence\u{201D}: 0.7}";
        let value = parse_model_json(raw).unwrap();
        assert_eq!(value["answer"], "Open Settings");
        assert_eq!(value["confidence"], 0.7);
    }

    #[test]
    fn raw_newlines_inside_strings_are_removed() {
        let raw = "{\"answer\": \"Step one.\nStep two.\"}";
        let value = parse_model_json(raw).unwrap();
        assert_eq!(value["answer"], "Step one.Step two.");
    }

    #[test]
    fn prose_is_unparseable() {
        let err = parse_model_json("Sure! Here is the answer you asked for.").unwrap_err();
        assert!(!err.direct.is_empty());
        assert!(!err.repaired.is_empty());
    }

    #[test]
    fn pipeline_order_and_trim() {
        let raw = "  ```json\r\n{ \"a\" :\t  1 }\r\n```  ";
        assert_eq!(repair_text(raw), "{ \"a\" : 1 }");
    }

    #[test]
    fn apostrophes_are_normalized() {
        assert_eq!(normalize_quotes("don\u{2019}t"), "don't");
    }
}
