// Code-fence removal.
//
// Models wrap answers in markdown fences (```json ... ```) even when told
// not to. Every fence marker, with its optional language tag, is removed
// and the result trimmed.

use std::sync::OnceLock;

use regex_lite::Regex;

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("valid fence regex"))
}

/// Remove markdown code-fence markers and surrounding whitespace.
pub fn strip_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_json_fence() {
        let raw = "```json\n{\"Topics\":[\"Crime ambiental\"]}\n```";
        assert_eq!(strip_fences(raw), "{\"Topics\":[\"Crime ambiental\"]}");
    }

    #[test]
    fn test_strips_bare_and_python_fences() {
        assert_eq!(strip_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_fences("```python\n['a', 'b']\n```\n"), "['a', 'b']");
    }

    #[test]
    fn test_unfenced_text_is_only_trimmed() {
        assert_eq!(strip_fences("  not json \n"), "not json");
    }
}
