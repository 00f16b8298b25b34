//! Line splitting
//!
//! Turns a text blob into the line sequence the differ consumes. Every line
//! keeps its `\n` terminator, so joining the sequence back together gives the
//! original text byte for byte.

/// Ordered lines of a text blob, terminators included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
}

impl LineSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    pub fn into_vec(self) -> Vec<String> {
        self.lines
    }

    /// Join the lines back into the text they were split from
    pub fn concat(&self) -> String {
        self.lines.concat()
    }

    /// Copy of the sequence whose last line is guaranteed a trailing `\n`.
    ///
    /// Diff output is line structured, so a final fragment without a newline
    /// is terminated before diffing. An empty sequence stays empty.
    pub fn terminated(&self) -> Self {
        let mut lines = self.lines.clone();
        if let Some(last) = lines.last_mut()
            && !last.ends_with('\n')
        {
            last.push('\n');
        }
        Self { lines }
    }
}

impl FromIterator<String> for LineSequence {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LineSequence {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

impl<'a> IntoIterator for &'a LineSequence {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Split `blob` on `\n`, keeping each terminator with its line.
///
/// A final fragment without a newline is kept as is, and a trailing newline
/// does not produce an empty last element. The empty string yields an empty
/// sequence.
pub fn split_lines(blob: &str) -> LineSequence {
    blob.split_inclusive('\n').map(str::to_owned).collect()
}
