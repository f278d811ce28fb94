//! fullmoon-minify - Minify Fullmoon HTML templates
//!
//! Strips insignificant whitespace from HTML while copying template
//! directives (`{% %}`, `{%# %}`, `{%& %}`, `{%= %}`) through byte for byte.
//!
//! The input is split into [`segment::Segment`]s; plain ones go through a
//! [`Minifier`], directives are kept, and everything is joined in order.

pub mod error;
pub mod minify;
pub mod segment;

use camino::Utf8Path;
use tracing::{debug, info, trace};

pub use error::{Error, Result};
pub use minify::{FragmentMinifier, HtmlMinifier, MinifyError, MinifyOptions, Minifier};
pub use segment::{Segment, SegmentKind, segment};

/// Counters for a single minification run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MinifyStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub directives: usize,
    pub plain_segments: usize,
}

impl MinifyStats {
    /// Bytes removed by minification
    pub fn saved_bytes(&self) -> usize {
        self.input_bytes.saturating_sub(self.output_bytes)
    }
}

/// Minify a template with [`FragmentMinifier`]
pub fn minify_template(input: &str) -> Result<String> {
    minify_template_with(&FragmentMinifier, input)
}

/// Minify a template with a caller-supplied minifier.
///
/// Fails on the first fragment the minifier rejects; nothing is returned
/// for the other fragments.
pub fn minify_template_with(minifier: &dyn Minifier, input: &str) -> Result<String> {
    assemble(minifier, input).map(|(output, _)| output)
}

fn assemble(minifier: &dyn Minifier, input: &str) -> Result<(String, MinifyStats)> {
    let segments = segment(input);
    let mut stats = MinifyStats {
        input_bytes: input.len(),
        ..MinifyStats::default()
    };
    let mut output = String::with_capacity(input.len());

    for (index, seg) in segments.iter().enumerate() {
        match seg.kind() {
            SegmentKind::Directive => {
                stats.directives += 1;
                output.push_str(seg.text());
            }
            SegmentKind::Plain => {
                stats.plain_segments += 1;
                let minified = minifier.minify_html(seg.text())?;
                trace!(
                    index,
                    before = seg.text().len(),
                    after = minified.len(),
                    "minified plain segment"
                );
                output.push_str(&minified);
            }
        }
    }

    stats.output_bytes = output.len();
    debug!(
        directives = stats.directives,
        plain = stats.plain_segments,
        "assembled template"
    );
    Ok((output, stats))
}

/// Read `input_path`, minify it, and write the result to `output_path`.
///
/// The whole file is read into memory and written with a single call.
/// A failed write can leave a partial output file behind.
pub fn minify_file(
    input_path: impl AsRef<Utf8Path>,
    output_path: impl AsRef<Utf8Path>,
) -> Result<MinifyStats> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    let content = fs_err::read_to_string(input_path)?;
    let (minified, stats) = assemble(&FragmentMinifier, &content)?;
    fs_err::write(output_path, minified)?;

    info!(
        input = %input_path,
        output = %output_path,
        before = stats.input_bytes,
        after = stats.output_bytes,
        "minified template"
    );
    Ok(stats)
}
