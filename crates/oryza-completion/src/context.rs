//! Bounded left/right context extraction around the cursor

use crate::trigger::TriggerPoints;

/// Budget-capped request context
///
/// `left` keeps the most recent characters before the cursor, `right` the
/// soonest characters after it. Extraction is pure and idempotent under
/// re-truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub left: String,
    pub right: String,
}

impl ContextWindow {
    /// Split `text` at `offset` (a character offset) and cap each side at
    /// `budget` characters
    pub fn extract(text: &str, offset: usize, budget: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let offset = offset.min(chars.len());

        let left_start = offset.saturating_sub(budget);
        let right_end = (offset + budget).min(chars.len());

        Self {
            left: chars[left_start..offset].iter().collect(),
            right: chars[offset..right_end].iter().collect(),
        }
    }

    /// Derive a trigger token for a keybind-triggered request
    ///
    /// Takes the last whitespace-delimited token of the current line of the
    /// left context and prefers its longest suffix that is registered as a
    /// no-space trigger, falling back to the full token when none is.
    pub fn derive_trigger(&self, points: &TriggerPoints) -> Option<String> {
        let line = match self.left.rfind('\n') {
            Some(pos) => &self.left[pos + 1..],
            None => self.left.as_str(),
        };
        let token = line.split_whitespace().last()?;

        let token_chars: Vec<char> = token.chars().collect();
        let max = points.max_no_space_len().min(token_chars.len());
        for len in (1..=max).rev() {
            let suffix: String = token_chars[token_chars.len() - len..].iter().collect();
            if points.lookup(&suffix) == Some(false) {
                return Some(suffix);
            }
        }
        Some(token.to_string())
    }
}
