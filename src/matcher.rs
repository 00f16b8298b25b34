//! Longest matching block diff.
//!
//! Recursively finds the longest contiguous run common to both sides, then
//! diffs what lies left and right of it. This is the matcher classic
//! unified/context diff tools are built on, so its alignment (and therefore
//! the hunks) matches theirs byte for byte. Output goes through a `similar`
//! [`DiffHook`], so the result can be grouped with
//! [`similar::group_diff_ops`] like any other `similar` algorithm.
//!
//! With 200 or more lines on the new side, lines occurring in more than 1% of
//! them (plus one) are not used to seed matches, though they still extend one.

use similar::algorithms::DiffHook;
use std::collections::HashMap;
use std::hash::Hash;

/// New side length at which popular lines stop seeding matches
const POPULAR_MIN_LEN: usize = 200;

/// A run of `len` equal items at `old_index` and `new_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Match {
    old_index: usize,
    new_index: usize,
    len: usize,
}

struct Matcher<'a, T> {
    old: &'a [T],
    new: &'a [T],
    /// Positions of each new-side item, popular items removed
    new_positions: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Hash + Eq> Matcher<'a, T> {
    fn new(old: &'a [T], new: &'a [T]) -> Self {
        let mut new_positions: HashMap<&T, Vec<usize>> = HashMap::new();
        for (idx, item) in new.iter().enumerate() {
            new_positions.entry(item).or_default().push(idx);
        }

        if new.len() >= POPULAR_MIN_LEN {
            let limit = new.len() / 100 + 1;
            new_positions.retain(|_, positions| positions.len() <= limit);
        }

        Self {
            old,
            new,
            new_positions,
        }
    }

    /// Longest equal run inside the two ranges, earliest on ties
    fn longest_match(
        &self,
        old_start: usize,
        old_end: usize,
        new_start: usize,
        new_end: usize,
    ) -> Match {
        let (mut best_old, mut best_new, mut best_len) = (old_start, new_start, 0);

        // Length of the run ending at each new-side index, for the previous old line
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();
        for old_idx in old_start..old_end {
            let mut next_run_lengths = HashMap::new();
            if let Some(positions) = self.new_positions.get(&self.old[old_idx]) {
                for &new_idx in positions {
                    if new_idx < new_start {
                        continue;
                    }
                    if new_idx >= new_end {
                        break;
                    }
                    let len = new_idx
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_lengths.insert(new_idx, len);
                    if len > best_len {
                        best_old = old_idx + 1 - len;
                        best_new = new_idx + 1 - len;
                        best_len = len;
                    }
                }
            }
            run_lengths = next_run_lengths;
        }

        // Popular lines never seed a run but may still extend one
        while best_old > old_start
            && best_new > new_start
            && self.old[best_old - 1] == self.new[best_new - 1]
        {
            best_old -= 1;
            best_new -= 1;
            best_len += 1;
        }
        while best_old + best_len < old_end
            && best_new + best_len < new_end
            && self.old[best_old + best_len] == self.new[best_new + best_len]
        {
            best_len += 1;
        }

        Match {
            old_index: best_old,
            new_index: best_new,
            len: best_len,
        }
    }

    /// Non-adjacent matching runs in order, closed by an empty sentinel
    fn matching_blocks(&self) -> Vec<Match> {
        let (old_len, new_len) = (self.old.len(), self.new.len());
        let mut found = Vec::new();
        let mut queue = vec![(0, old_len, 0, new_len)];

        while let Some((old_start, old_end, new_start, new_end)) = queue.pop() {
            let m = self.longest_match(old_start, old_end, new_start, new_end);
            if m.len == 0 {
                continue;
            }
            found.push(m);
            if old_start < m.old_index && new_start < m.new_index {
                queue.push((old_start, m.old_index, new_start, m.new_index));
            }
            if m.old_index + m.len < old_end && m.new_index + m.len < new_end {
                queue.push((m.old_index + m.len, old_end, m.new_index + m.len, new_end));
            }
        }
        found.sort();

        let mut blocks: Vec<Match> = Vec::with_capacity(found.len() + 1);
        for m in found {
            match blocks.last_mut() {
                Some(last)
                    if last.old_index + last.len == m.old_index
                        && last.new_index + last.len == m.new_index =>
                {
                    last.len += m.len;
                }
                _ => blocks.push(m),
            }
        }
        blocks.push(Match {
            old_index: old_len,
            new_index: new_len,
            len: 0,
        });
        blocks
    }
}

/// Diff `old` against `new`, reporting every operation to `d`.
///
/// A region changed on both sides is reported as one `replace`.
pub fn diff<T, D>(d: &mut D, old: &[T], new: &[T]) -> Result<(), D::Error>
where
    T: Hash + Eq,
    D: DiffHook,
{
    let matcher = Matcher::new(old, new);
    let (mut old_idx, mut new_idx) = (0, 0);

    for block in matcher.matching_blocks() {
        let old_gap = block.old_index - old_idx;
        let new_gap = block.new_index - new_idx;
        match (old_gap > 0, new_gap > 0) {
            (true, true) => d.replace(old_idx, old_gap, new_idx, new_gap)?,
            (true, false) => d.delete(old_idx, old_gap, new_idx)?,
            (false, true) => d.insert(old_idx, new_idx, new_gap)?,
            (false, false) => {}
        }
        if block.len > 0 {
            d.equal(block.old_index, block.new_index, block.len)?;
        }
        old_idx = block.old_index + block.len;
        new_idx = block.new_index + block.len;
    }

    d.finish()
}
