//! Splitting templates into directive and plain-HTML segments
//!
//! A directive is `{%`, an optional `#`, `&` or `=` modifier, then anything
//! up to the first `%}`. Directives do not span lines. Everything else is
//! plain text, including a `{%` that never gets closed.

use regex::Regex;
use std::sync::LazyLock;

/// Regex matching a single Fullmoon directive (non-greedy)
static DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%[#&=]?.*?%\}").unwrap());

/// What a segment holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A template directive, copied through untouched
    Directive,
    /// Plain HTML, subject to minification
    Plain,
}

/// A contiguous slice of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    kind: SegmentKind,
    text: &'a str,
}

impl<'a> Segment<'a> {
    pub fn directive(text: &'a str) -> Self {
        Self {
            kind: SegmentKind::Directive,
            text,
        }
    }

    pub fn plain(text: &'a str) -> Self {
        Self {
            kind: SegmentKind::Plain,
            text,
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// The exact input substring
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn is_directive(&self) -> bool {
        self.kind == SegmentKind::Directive
    }
}

/// Split `input` into segments.
///
/// The result alternates plain and directive segments, starting and ending
/// with a (possibly empty) plain one, so `n` directives give `2n + 1`
/// segments. Concatenating every segment's text yields `input` again.
pub fn segment(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in DIRECTIVE_REGEX.find_iter(input) {
        segments.push(Segment::plain(&input[last..m.start()]));
        segments.push(Segment::directive(m.as_str()));
        last = m.end();
    }
    segments.push(Segment::plain(&input[last..]));

    segments
}

/// Check whether `text` is exactly one directive
pub fn is_directive(text: &str) -> bool {
    DIRECTIVE_REGEX
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
        segments.iter().map(|s| s.text()).collect()
    }

    #[test]
    fn test_no_directives() {
        let segments = segment("<p>hello</p>");
        assert_eq!(segments, vec![Segment::plain("<p>hello</p>")]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(segment(""), vec![Segment::plain("")]);
    }

    #[test]
    fn test_modifiers() {
        let input = "{% a %}{%# b %}{%& c %}{%= d %}";
        let directives: Vec<_> = segment(input)
            .into_iter()
            .filter(Segment::is_directive)
            .map(|s| s.text())
            .collect();
        assert_eq!(directives, vec!["{% a %}", "{%# b %}", "{%& c %}", "{%= d %}"]);
    }

    #[test]
    fn test_non_greedy() {
        let segments = segment("<a>{%= x %}</a> <b>{%= y %}</b>");
        assert_eq!(
            texts(&segments),
            vec!["<a>", "{%= x %}", "</a> <b>", "{%= y %}", "</b>"]
        );
    }

    #[test]
    fn test_adjacent_directives_leave_empty_plain() {
        let segments = segment("{%a%}{%b%}");
        assert_eq!(
            segments,
            vec![
                Segment::plain(""),
                Segment::directive("{%a%}"),
                Segment::plain(""),
                Segment::directive("{%b%}"),
                Segment::plain(""),
            ]
        );
    }

    #[test]
    fn test_alternation() {
        let segments = segment("x{%a%}y{%b%}z{%c%}");
        assert_eq!(segments.len(), 7);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.is_directive(), i % 2 == 1, "segment {i}: {s:?}");
        }
    }

    #[test]
    fn test_unclosed_directive_is_plain() {
        let input = "<p>{% oops</p>";
        assert_eq!(segment(input), vec![Segment::plain(input)]);
    }

    #[test]
    fn test_other_modifier_is_body() {
        // `!` is not a modifier, but the directive still matches with `!` in its body
        let segments = segment("{%! x %}");
        assert_eq!(texts(&segments), vec!["", "{%! x %}", ""]);
    }

    #[test]
    fn test_directive_does_not_span_lines() {
        let input = "{% a\nb %}";
        assert_eq!(segment(input), vec![Segment::plain(input)]);
    }

    #[test]
    fn test_lossless() {
        let inputs = [
            "",
            "plain",
            "{%a%}",
            "  <p>\n  hi  </p>  {%# note %}  <p> bye </p>  ",
            "{%= x %} {% if y %}<b>{%& z %}</b>{% end %}",
            "{% broken <i>{%= ok %}</i> %}",
            "héllo {%= wörld %} ✓",
        ];
        for input in inputs {
            let rebuilt: String = segment(input).iter().map(|s| s.text()).collect();
            assert_eq!(rebuilt, input);
        }
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive("{%= x %}"));
        assert!(is_directive("{%%}"));
        assert!(!is_directive(" {%= x %}"));
        assert!(!is_directive("{%= x %} "));
        assert!(!is_directive("<p>"));
        assert!(!is_directive("{% x"));
    }
}
