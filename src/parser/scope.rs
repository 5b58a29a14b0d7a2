// Brace-depth scope tracking
//
// Lines are addressed by index; a scope is an inclusive index range. The same
// primitive serves function bodies and class bodies.

use serde::Serialize;

/// Inclusive range of line indices a brace-delimited body spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopeRange {
    pub start: usize,
    pub end: usize,
}

impl ScopeRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of lines covered
    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// The lines of `lines` covered by this range, clamped to the slice
    pub fn slice<'a, 'b>(&self, lines: &'a [&'b str]) -> &'a [&'b str] {
        if self.start >= lines.len() {
            return &[];
        }
        let end = self.end.min(lines.len() - 1);
        &lines[self.start..=end]
    }
}

/// Find the body that opens at or after `start`.
///
/// Returns `None` when a `;` ends the construct before any `{` is seen, or
/// when no `{` appears at all. A body that is never closed runs to the last
/// line.
pub fn track_scope(lines: &[&str], start: usize) -> Option<ScopeRange> {
    let mut depth: i64 = 0;
    let mut opened = false;

    for (index, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                ';' if !opened => return None,
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' if opened => depth -= 1,
                _ => {}
            }
        }

        if opened && depth <= 0 {
            return Some(ScopeRange::new(start, index));
        }
    }

    if opened {
        Some(ScopeRange::new(start, lines.len() - 1))
    } else {
        None
    }
}
