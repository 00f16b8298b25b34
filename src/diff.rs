//! Unified and context diff rendering
//!
//! Opcodes come from the longest matching block matcher and are grouped into
//! hunks by `similar`; the text layout follows the classic `diff -u` /
//! `diff -c` formats with three lines of context.

use crate::constant::DIFF_CONTEXT_LINES;
use crate::lines::LineSequence;
use crate::matcher;
use similar::algorithms::Capture;
use similar::{DiffOp, DiffTag, group_diff_ops};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

const CONTEXT_HUNK_SEPARATOR: &str = "***************\n";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown diff style: {0}")]
pub struct UnknownDiffStyle(pub String);

/// Output layout of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffStyle {
    /// `---`/`+++` headers with `@@` hunks
    #[default]
    Unified,
    /// `***`/`---` headers with before and after blocks per hunk
    Context,
}

impl DiffStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStyle::Unified => "unified",
            DiffStyle::Context => "context",
        }
    }
}

impl fmt::Display for DiffStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffStyle {
    type Err = UnknownDiffStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unified" => Ok(DiffStyle::Unified),
            "context" => Ok(DiffStyle::Context),
            other => Err(UnknownDiffStyle(other.to_string())),
        }
    }
}

/// Rendered diff, one entry per output line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    lines: Vec<String>,
}

impl DiffResult {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the inputs had no differences
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_string(self) -> String {
        self.lines.concat()
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Diff `old` against `new`, labelling the two sides verbatim in the header.
///
/// Identical inputs give an empty result.
pub fn format_diff(
    old: &LineSequence,
    new: &LineSequence,
    old_label: &str,
    new_label: &str,
    style: DiffStyle,
) -> DiffResult {
    let old_lines: Vec<&str> = old.iter().map(String::as_str).collect();
    let new_lines: Vec<&str> = new.iter().map(String::as_str).collect();

    let mut capture = Capture::new();
    let groups = match matcher::diff(&mut capture, &old_lines, &new_lines) {
        Ok(()) => group_diff_ops(capture.into_ops(), DIFF_CONTEXT_LINES),
        Err(never) => match never {},
    };

    let mut out = DiffOutput::default();
    for (idx, group) in groups.iter().enumerate() {
        match style {
            DiffStyle::Unified => {
                if idx == 0 {
                    out.push(format!("--- {}\n", old_label));
                    out.push(format!("+++ {}\n", new_label));
                }
                write_unified_hunk(&mut out, group, &old_lines, &new_lines);
            }
            DiffStyle::Context => {
                if idx == 0 {
                    out.push(format!("*** {}\n", old_label));
                    out.push(format!("--- {}\n", new_label));
                }
                write_context_hunk(&mut out, group, &old_lines, &new_lines);
            }
        }
    }

    DiffResult { lines: out.lines }
}

#[derive(Default)]
struct DiffOutput {
    lines: Vec<String>,
}

impl DiffOutput {
    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Emit a prefixed content line, terminating it if the input line was not
    fn content(&mut self, prefix: &str, line: &str) {
        let mut out = String::with_capacity(prefix.len() + line.len() + 1);
        out.push_str(prefix);
        out.push_str(line);
        if !line.ends_with('\n') {
            out.push('\n');
        }
        self.lines.push(out);
    }
}

/// Span of a hunk on the old and new side
fn hunk_ranges(group: &[DiffOp]) -> (Range<usize>, Range<usize>) {
    match (group.first(), group.last()) {
        (Some(first), Some(last)) => (
            first.old_range().start..last.old_range().end,
            first.new_range().start..last.new_range().end,
        ),
        _ => (0..0, 0..0),
    }
}

/// `@@` range: `start` for one line, `start,len` otherwise
fn unified_range(range: &Range<usize>) -> String {
    let mut beginning = range.start + 1;
    let len = range.len();
    if len == 1 {
        return beginning.to_string();
    }
    if len == 0 {
        beginning -= 1;
    }
    format!("{},{}", beginning, len)
}

/// `***`/`---` range: `start` for up to one line, `first,last` otherwise
fn context_range(range: &Range<usize>) -> String {
    let mut beginning = range.start + 1;
    let len = range.len();
    if len == 0 {
        beginning -= 1;
    }
    if len <= 1 {
        return beginning.to_string();
    }
    format!("{},{}", beginning, beginning + len - 1)
}

fn write_unified_hunk(out: &mut DiffOutput, group: &[DiffOp], old: &[&str], new: &[&str]) {
    let (old_span, new_span) = hunk_ranges(group);
    out.push(format!(
        "@@ -{} +{} @@\n",
        unified_range(&old_span),
        unified_range(&new_span)
    ));

    for op in group {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                for line in &old[old_range] {
                    out.content(" ", line);
                }
            }
            DiffTag::Delete => {
                for line in &old[old_range] {
                    out.content("-", line);
                }
            }
            DiffTag::Insert => {
                for line in &new[new_range] {
                    out.content("+", line);
                }
            }
            DiffTag::Replace => {
                for line in &old[old_range] {
                    out.content("-", line);
                }
                for line in &new[new_range] {
                    out.content("+", line);
                }
            }
        }
    }
}

fn context_prefix(tag: DiffTag) -> &'static str {
    match tag {
        DiffTag::Equal => "  ",
        DiffTag::Delete => "- ",
        DiffTag::Insert => "+ ",
        DiffTag::Replace => "! ",
    }
}

fn write_context_hunk(out: &mut DiffOutput, group: &[DiffOp], old: &[&str], new: &[&str]) {
    let (old_span, new_span) = hunk_ranges(group);
    out.push(CONTEXT_HUNK_SEPARATOR.to_string());

    out.push(format!("*** {} ****\n", context_range(&old_span)));
    let touches_old = group
        .iter()
        .any(|op| matches!(op.tag(), DiffTag::Delete | DiffTag::Replace));
    if touches_old {
        for op in group {
            let (tag, old_range, _) = op.as_tag_tuple();
            if tag == DiffTag::Insert {
                continue;
            }
            for line in &old[old_range] {
                out.content(context_prefix(tag), line);
            }
        }
    }

    out.push(format!("--- {} ----\n", context_range(&new_span)));
    let touches_new = group
        .iter()
        .any(|op| matches!(op.tag(), DiffTag::Insert | DiffTag::Replace));
    if touches_new {
        for op in group {
            let (tag, _, new_range) = op.as_tag_tuple();
            if tag == DiffTag::Delete {
                continue;
            }
            for line in &new[new_range] {
                out.content(context_prefix(tag), line);
            }
        }
    }
}
