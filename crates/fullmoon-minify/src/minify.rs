//! HTML minification
//!
//! Plain-HTML fragments are minified through the [`Minifier`] trait.
//!
//! Fragments come from between template directives, so they are rarely
//! balanced: `<li>` may sit in one fragment and `</li>` in the next.
//! [`FragmentMinifier`] only touches text between tags and never drops or
//! rewrites a tag, which keeps it safe on such fragments. [`HtmlMinifier`]
//! runs minify-html, which parses its input as a complete document and is
//! meant for templates whose fragments are well-formed on their own.

use std::sync::LazyLock;

use minify_html::{Cfg, minify};
use regex::Regex;
use thiserror::Error;

/// Error returned when a minifier rejects a fragment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinifyError {
    /// The minifier produced bytes that are not valid UTF-8
    #[error("minification of a {fragment_len}-byte fragment produced invalid UTF-8")]
    InvalidUtf8 { fragment_len: usize },

    /// The minifier refused the fragment
    #[error("minifier rejected fragment: {message}")]
    Rejected { message: String },
}

/// Minification service for plain-HTML fragments.
///
/// Implementations must map empty input to empty output.
pub trait Minifier {
    /// Minify an HTML fragment
    ///
    /// Returns minified HTML, or an error if minification fails.
    fn minify_html(&self, fragment: &str) -> Result<String, MinifyError>;
}

// ============================================================================
// Fragment minifier
// ============================================================================

/// Comments, doctypes, opening and closing tags. A `<` not followed by a
/// letter (`a < b`) is text. Quoted attribute values may contain `>`.
/// A tag, quote or comment left open at the end of the fragment
/// (`<a href="` before a directive) runs to the end.
static MARKUP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?(?:-->|\z)|<[!/?]?[A-Za-z](?:[^>"']|"[^"]*(?:"|\z)|'[^']*(?:'|\z))*(?:>|\z)"#,
    )
    .unwrap()
});

/// Opening tag of an element whose content is copied verbatim
static VERBATIM_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<(pre|textarea|script|style)[\s/>]").unwrap());

/// HTML whitespace (not Unicode whitespace: `&nbsp;` must survive)
static WHITESPACE_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r\x0C]+").unwrap());

fn is_html_whitespace(text: &str) -> bool {
    text.bytes()
        .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C'))
}

/// Whitespace-only text disappears; any other run collapses to one space
fn push_text(out: &mut String, text: &str) {
    if is_html_whitespace(text) {
        return;
    }
    out.push_str(&WHITESPACE_RUN_REGEX.replace_all(text, " "));
}

/// End of the content of a verbatim element opened before `from`.
///
/// `lower` is the ASCII-lowercased fragment, so its byte offsets are the
/// fragment's. `</pref>` does not close a `<pre>`.
fn verbatim_end(lower: &str, from: usize, name: &str) -> usize {
    let needle = format!("</{name}");
    let mut search = from;
    while let Some(offset) = lower[search..].find(&needle) {
        let start = search + offset;
        let after = start + needle.len();
        match lower.as_bytes().get(after) {
            None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0C') => return start,
            Some(_) => search = after,
        }
    }
    lower.len()
}

/// Tag-preserving whitespace minifier for template fragments.
///
/// - whitespace-only text between tags is removed,
/// - other whitespace runs in text collapse to a single space,
/// - tags and comments are copied unchanged,
/// - `<pre>`, `<textarea>`, `<script>` and `<style>` content is untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentMinifier;

impl Minifier for FragmentMinifier {
    fn minify_html(&self, fragment: &str) -> Result<String, MinifyError> {
        let mut out = String::with_capacity(fragment.len());
        let mut lower: Option<String> = None;
        let mut pos = 0;

        while let Some(markup) = MARKUP_REGEX.find_at(fragment, pos) {
            push_text(&mut out, &fragment[pos..markup.start()]);
            out.push_str(markup.as_str());
            pos = markup.end();

            if let Some(caps) = VERBATIM_OPEN_REGEX.captures(markup.as_str()) {
                let name = caps[1].to_ascii_lowercase();
                let lower = lower.get_or_insert_with(|| fragment.to_ascii_lowercase());
                let end = verbatim_end(lower, pos, &name);
                out.push_str(&fragment[pos..end]);
                pos = end;
            }
        }
        push_text(&mut out, &fragment[pos..]);

        Ok(out)
    }
}

// ============================================================================
// minify-html
// ============================================================================

/// Options for [`HtmlMinifier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinifyOptions {
    /// Keep closing tags minify-html would otherwise drop (e.g. `</p>`)
    pub keep_closing_tags: bool,
    /// Keep `<!-- comments -->`
    pub keep_comments: bool,
    /// Minify `<style>` bodies and `style` attributes
    pub minify_css: bool,
    /// Minify `<script>` bodies
    pub minify_js: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            keep_closing_tags: true,
            keep_comments: false,
            minify_css: false,
            minify_js: false,
        }
    }
}

impl MinifyOptions {
    fn cfg(&self) -> Cfg {
        Cfg {
            keep_closing_tags: self.keep_closing_tags,
            keep_html_and_head_opening_tags: true,
            keep_comments: self.keep_comments,
            minify_css: self.minify_css,
            minify_js: self.minify_js,
            // Directives spanning several lines are not split out
            preserve_brace_template_syntax: true,
            ..Cfg::default()
        }
    }
}

/// [`Minifier`] backed by minify-html
///
/// minify-html parses every fragment as a whole document. A directive
/// inside a tag or between an element's open and close tags corrupts the
/// output: the tail of a split attribute (`<li class="` becomes `<li>`) and
/// unmatched closing tags (`</li></ul>` becomes empty) are dropped, even
/// with `keep_closing_tags`. Only use it on templates whose fragments are
/// well-formed on their own.
#[derive(Debug, Clone, Default)]
pub struct HtmlMinifier {
    options: MinifyOptions,
}

impl HtmlMinifier {
    pub fn new(options: MinifyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }
}

impl Minifier for HtmlMinifier {
    fn minify_html(&self, fragment: &str) -> Result<String, MinifyError> {
        if fragment.is_empty() {
            return Ok(String::new());
        }

        let result = minify(fragment.as_bytes(), &self.options.cfg());
        String::from_utf8(result).map_err(|_| MinifyError::InvalidUtf8 {
            fragment_len: fragment.len(),
        })
    }
}
