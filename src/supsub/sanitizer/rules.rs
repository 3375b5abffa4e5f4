//! Rewrite rule tables
//!
//! Every rule is a named `(pattern, replacement)` pair. Rules are declared in const tables and
//! applied strictly in declaration order; the order encodes the pipeline, so reordering a
//! table changes behaviour.
//!
//! Patterns are case-insensitive. `[\s\x{FEFF}]` is the whitespace class used throughout: the
//! placeholder character counts as whitespace, the way browser regular expressions see it.
//!
//! Two rules need negative lookahead, which `regex` does not offer; they run on `fancy-regex`
//! instead. A backtracking failure there leaves the input of that rule untouched.

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Plain,
    Lookaround,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub engine: Engine,
}

const fn rule(name: &'static str, pattern: &'static str, replacement: &'static str) -> RuleSpec {
    RuleSpec {
        name,
        pattern,
        replacement,
        engine: Engine::Plain,
    }
}

const fn lookaround(name: &'static str, pattern: &'static str, replacement: &'static str) -> RuleSpec {
    RuleSpec {
        name,
        pattern,
        replacement,
        engine: Engine::Lookaround,
    }
}

/// The `clean` pipeline, one pass.
pub const CLEAN_RULES: &[RuleSpec] = &[
    // 1. empty paragraphs and line breaks
    rule("empty_paragraph", r"(?i)<p(?:\s[^>]*)?>(?:&nbsp;|[\s\x{FEFF}])*</p\s*>", ""),
    rule("line_break", r"(?i)</?br\b[^>]*>", ""),
    // 2. bare mark tags
    rule("sup_attributes", r"(?i)<sup\b[^>]*>", "<sup>"),
    rule("sub_attributes", r"(?i)<sub\b[^>]*>", "<sub>"),
    rule("sup_close", r"(?i)</sup\s*>", "</sup>"),
    rule("sub_close", r"(?i)</sub\s*>", "</sub>"),
    // 3. non-breaking spaces
    rule("nbsp", r"(?i)&nbsp;|\x{A0}", " "),
    // 4. same-mark runs separated only by whitespace
    rule("merge_sup", r"(?i)</sup>([\s\x{FEFF}]*)<sup>", "${1}"),
    rule("merge_sub", r"(?i)</sub>([\s\x{FEFF}]*)<sub>", "${1}"),
    // 5. whitespace moves outside the marks
    rule("sup_leading_space", r"(?i)<sup>([\s\x{FEFF}]+)", "${1}<sup>"),
    rule("sub_leading_space", r"(?i)<sub>([\s\x{FEFF}]+)", "${1}<sub>"),
    rule("sup_trailing_space", r"(?i)([\s\x{FEFF}]+)</sup>", "</sup>${1}"),
    rule("sub_trailing_space", r"(?i)([\s\x{FEFF}]+)</sub>", "</sub>${1}"),
    // 6. blocks removed with their content
    rule("style_block", r"(?i)<style\b[^>]*>[\s\S]*?</style\s*>", ""),
    rule("script_block", r"(?i)<script\b[^>]*>[\s\S]*?</script\s*>", ""),
    lookaround("unterminated_comment", r"<!--(?![\s\S]*?-->)", ""),
    // 7. tags stripped, content kept. Names match as prefixes, so `p` also takes
    // `<path>` and `<picture>`; `s` alone would take the marks and has its own rule.
    rule(
        "common_tags",
        r"(?i)</?(?:br|title|meta|style|std|font|html|head|body|link|a|ul|li|ol)[^>]*>",
        "",
    ),
    rule("inline_tags", r"(?i)</?(?:b|i|u|ul|ol|li|img)[^>]*>", ""),
    rule(
        "html5_tags_a_b",
        r"(?i)</?(?:abbr|address|area|article|aside|audio|base|bdi|bdo|blockquote)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_b_d",
        r"(?i)</?(?:button|canvas|caption|cite|code|col|colgroup|content|data)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_d_e",
        r"(?i)</?(?:datalist|dd|decorator|del|details|dialog|dfn|div|dl|dt|element)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_e_h",
        r"(?i)</?(?:em|embed|fieldset|figcaption|figure|footer|form|h1|h2|h3|h4|h5)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_h_l",
        r"(?i)</?(?:h6|header|hgroup|hr|iframe|input|ins|kbd|keygen|label|legend)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_m_o",
        r"(?i)</?(?:main|map|mark|menu|menuitem|meter|nav|noscript|object|optgroup)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_o_s",
        r"(?i)</?(?:option|output|p|param|pre|progress|q|rp|rt|rtc|ruby|samp)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_s",
        r"(?i)</?(?:section|select|script|shadow|small|source|std|strong|summary)[^>]*>",
        "",
    ),
    rule(
        "html5_tags_s_t",
        r"(?i)</?(?:svg|table|tbody|td|template|textarea|time|tfoot|th|thead|tr|track)[^>]*>",
        "",
    ),
    rule("html5_tags_v_w", r"(?i)</?(?:var|wbr|video)[^>]*>", ""),
    rule(
        "deprecated_tags_a_i",
        r"(?i)</?(?:acronym|applet|basefont|big|blink|center|dir|frame|frameset|isindex)[^>]*>",
        "",
    ),
    rule(
        "deprecated_tags_l_x",
        r"(?i)</?(?:listing|noembed|plaintext|spacer|strike|tt|xmp)[^>]*>",
        "",
    ),
    rule("s_tag", r"(?i)</?s\b[^>]*>", ""),
    rule("foreign_tags", r"(?i)</?(?:jsl|nobr)[^>]*>", ""),
    // 8. spans and plugin wrappers; selection markers survive
    lookaround(
        "empty_span",
        r"(?i)<span\b(?![^>]*?rangySelectionBoundary)[^>]*>(?:&nbsp;|[\s\x{FEFF}])*</span\s*>",
        "",
    ),
    lookaround(
        "unwrap_span",
        r"(?i)<span\b(?![^>]*?rangySelectionBoundary)[^>]*>([\s\S]*?)</span\s*>",
        "${1}",
    ),
    rule("xmlns_wrapper", r"(?i)<xmlns[^>]*>([\s\S]*?)</xmlns[^>]*>", "${1}"),
    // 9. empty marks
    rule("empty_sup", r"(?i)<sup\b[^>]*>(?:&nbsp;|[\s\x{FEFF}])*</sup\s*>", ""),
    rule("empty_sub", r"(?i)<sub\b[^>]*>(?:&nbsp;|[\s\x{FEFF}])*</sub\s*>", ""),
    // 10. placeholders
    rule("placeholder", r"\x{FEFF}", ""),
];

/// Clipboard artifacts left by office suites and browsers, removed before anything else.
pub const PASTE_ARTIFACT_RULES: &[RuleSpec] = &[
    rule("after_html_close", r"(?i)<\s*/html\s*>[\s\S]+$", ""),
    rule("conditional_comment", r"(?i)<!--\[if[\s\S]*?endif\]-->", ""),
    rule("fragment_marker", r"(?i)<!--(?:Start|End)Fragment-->", ""),
    rule("xml_island", r"(?i)<xml[^>]*>[\s\S]*?</xml\s*>", ""),
    rule("xml_declaration", r"(?i)<\?xml[^>]*>", ""),
    rule("namespaced_tag", r"(?i)</?\w+:[^>]*>", ""),
];

/// Vendor cruft that only shows up once pasted markup has been re-serialized.
pub const VENDOR_RULES: &[RuleSpec] = &[
    rule(
        "mso_style",
        r#"(?i)(<[^>]*?style\s*?=\s*?"[^>"]*?)(?:\s*MSO[-:][^>;"]*;?)+"#,
        "${1}",
    ),
    rule(
        "mso_class",
        r#"(?i)(<[^>]*?class\s*?=\s*?"[^>"]*?)(?:\s*MSO[_a-zA-Z0-9-]*)+"#,
        "${1}",
    ),
    rule(
        "apple_class",
        r#"(?i)(<[^>]*?class\s*?=\s*?"[^>"]*?)(?:\s*Apple-[_a-zA-Z0-9-]*)+"#,
        "${1}",
    ),
    rule(
        "ole_link_anchor",
        r#"(?i)<a [^>]*?name\s*?=\s*?"OLE_LINK\d*?"[^>]*?>\s*?</a>"#,
        "",
    ),
];

pub(crate) static CLEAN: Lazy<RuleSet> = Lazy::new(|| RuleSet::compile(CLEAN_RULES).unwrap());
pub(crate) static PASTE_ARTIFACTS: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::compile(PASTE_ARTIFACT_RULES).unwrap());
pub(crate) static VENDOR: Lazy<RuleSet> = Lazy::new(|| RuleSet::compile(VENDOR_RULES).unwrap());

/// A rule pattern that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    pub rule: &'static str,
    pub message: String,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule '{}' does not compile: {}", self.rule, self.message)
    }
}

impl std::error::Error for RuleError {}

#[derive(Debug)]
enum Compiled {
    Plain(Regex),
    Lookaround(FancyRegex),
}

#[derive(Debug)]
struct Rule {
    spec: RuleSpec,
    compiled: Compiled,
}

impl Rule {
    fn compile(spec: RuleSpec) -> Result<Self, RuleError> {
        let error = |message: String| RuleError {
            rule: spec.name,
            message,
        };
        let compiled = match spec.engine {
            Engine::Plain => Compiled::Plain(Regex::new(spec.pattern).map_err(|e| error(e.to_string()))?),
            Engine::Lookaround => {
                Compiled::Lookaround(FancyRegex::new(spec.pattern).map_err(|e| error(e.to_string()))?)
            }
        };
        Ok(Self { spec, compiled })
    }

    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.compiled {
            Compiled::Plain(regex) => regex.replace_all(text, self.spec.replacement),
            Compiled::Lookaround(regex) => regex
                .try_replacen(text, 0, self.spec.replacement)
                .unwrap_or_else(|err| {
                    warn!(rule = self.spec.name, %err, "rule skipped");
                    Cow::Borrowed(text)
                }),
        }
    }
}

/// An ordered, compiled rule table.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, RuleError> {
        let rules = specs.iter().copied().map(Rule::compile).collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Feed `input` through every rule once, in order.
    pub fn apply(&self, input: &str) -> String {
        let mut text = input.to_owned();
        for rule in &self.rules {
            if let Cow::Owned(rewritten) = rule.apply(&text) {
                text = rewritten;
            }
        }
        text
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.spec.name)
    }
}
