use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::CleanOptions;

static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));
// Heuristic: the shortest `{...}` span, across newlines, with optional quotes.
static JSON_ARTIFACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"?\{.*?\}"?"#).expect("valid regex"));

/// Normalizes extracted message text for display.
///
/// Link syntax is reduced to its label, HTML entities are decoded, stray
/// `{...}` payloads are dropped (unless disabled) and the result is trimmed.
pub fn clean_content(content: &str, options: CleanOptions) -> String {
    let unlinked = MARKDOWN_LINK_RE.replace_all(content, "$1");
    let decoded = html_escape::decode_html_entities(&unlinked);

    if options.strip_json_artifacts {
        JSON_ARTIFACT_RE.replace_all(&decoded, "").trim().to_string()
    } else {
        decoded.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::clean::clean_content;
    use crate::model::CleanOptions;

    fn clean(content: &str) -> String {
        clean_content(content, CleanOptions::default())
    }

    #[test]
    fn strips_markdown_links() {
        assert_eq!(clean("Check [here](http://x.com) now"), "Check here now");
        assert_eq!(
            clean("[a](http://a.com) and [b](http://b.com)"),
            "a and b"
        );
    }

    #[test]
    fn decodes_html_entities() {
        assert_eq!(clean("fish &amp; chips &lt;3 &#39;ok&#39;"), "fish & chips <3 'ok'");
    }

    #[test]
    fn removes_json_artifacts() {
        assert_eq!(clean(r#"Result {"status":"ok"} done"#), "Result  done");
    }

    #[test]
    fn removes_quoted_multiline_artifacts() {
        let content = "before \"{\n  \"debug\": true\n}\" after";
        assert_eq!(clean(content), "before  after");
    }

    #[test]
    fn artifact_match_is_non_greedy() {
        assert_eq!(clean("a {x} b {y} c"), "a  b  c");
    }

    #[test]
    fn brace_heuristic_also_eats_prose() {
        assert_eq!(clean("the set {1, 2, 3} is finite"), "the set  is finite");
        assert_eq!(clean("fn main() { run(); }"), "fn main()");
    }

    #[test]
    fn brace_stripping_can_be_disabled() {
        let options = CleanOptions {
            strip_json_artifacts: false,
        };
        assert_eq!(
            clean_content("  the set {1, 2, 3} is finite ", options),
            "the set {1, 2, 3} is finite"
        );
    }

    #[test]
    fn entity_encoded_braces_are_stripped_after_decoding() {
        assert_eq!(clean("x &#123;\"a\":1&#125; y"), "x  y");
    }

    #[test]
    fn whitespace_only_cleans_to_empty() {
        assert_eq!(clean(" \n\t "), "");
        assert_eq!(clean(r#"{"status":"ok"}"#), "");
    }
}
