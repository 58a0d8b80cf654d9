//! Trigger-point table and edit-time trigger scanner

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Bundled trigger vocabulary: keywords that require a trailing space and
/// operators that fire immediately
const BUNDLED_TABLE: &str = include_str!("../resources/trigger_points.json");

#[derive(Debug, Deserialize)]
struct TriggerPointsFile {
    #[serde(rename = "enforceSpace")]
    enforce_space: Vec<String>,
    #[serde(rename = "noSpace")]
    no_space: Vec<String>,
}

/// Read-only trigger-point table
///
/// Maps each trigger token to whether it must be followed by a space to fire.
/// Loaded once at session start from a static configuration resource.
#[derive(Debug)]
pub struct TriggerPoints {
    map: HashMap<String, bool>,
    max_len: usize,
    max_no_space_len: usize,
}

impl TriggerPoints {
    /// Parse a table from its JSON resource form: two string arrays,
    /// `enforceSpace` and `noSpace`
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TriggerPointsFile = serde_json::from_str(json)?;

        let mut map = HashMap::new();
        for token in file.enforce_space {
            map.insert(token, true);
        }
        let mut max_no_space_len = 0;
        for token in file.no_space {
            max_no_space_len = max_no_space_len.max(token.chars().count());
            map.insert(token, false);
        }
        let max_len = map.keys().map(|k| k.chars().count()).max().unwrap_or(0);

        Ok(Self {
            map,
            max_len,
            max_no_space_len,
        })
    }

    /// The table shipped with the plugin
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TABLE)
    }

    /// `Some(requires_trailing_space)` when `token` is registered
    pub fn lookup(&self, token: &str) -> Option<bool> {
        self.map.get(token).copied()
    }

    /// Length in characters of the longest registered token
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Length in characters of the longest registered no-space token
    pub fn max_no_space_len(&self) -> usize {
        self.max_no_space_len
    }
}

/// A successful trigger scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// The matched trigger token
    pub token: String,
    /// Character offset immediately after the edit, where the completion applies
    pub offset: usize,
}

/// Edit-time trigger scanner
///
/// On every buffer edit, decides synchronously whether a completion request
/// should fire. `cursor` is the offset of the character the edit just produced;
/// the completion itself applies at `cursor + 1`.
#[derive(Debug, Clone)]
pub struct TriggerScanner {
    points: Arc<TriggerPoints>,
}

impl TriggerScanner {
    pub fn new(points: Arc<TriggerPoints>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &Arc<TriggerPoints> {
        &self.points
    }

    /// Scan backward from the cursor for a registered trigger token
    ///
    /// Only fires when the cursor sits at end-of-line (the character after the
    /// edit position is absent or a line break). The scan grows a window one
    /// character at a time away from the cursor, skipping a single contiguous
    /// run of spaces directly at the cursor; the shortest matching window wins.
    /// Enforce-space tokens match only when at least one space was skipped.
    pub fn scan(&self, text: &str, cursor: usize) -> Option<TriggerMatch> {
        if text.trim().is_empty() {
            return None;
        }

        let chars: Vec<char> = text.chars().collect();
        if cursor >= chars.len() {
            return None;
        }

        let after = cursor + 1;
        if after < chars.len() && chars[after] != '\n' {
            return None;
        }

        let mut in_leading_spaces = chars[cursor] == ' ';
        let mut spaces = 0usize;
        let mut i = 0usize;
        while i < self.points.max_len() {
            let Some(j) = cursor.checked_sub(spaces + i) else {
                break;
            };
            let c = chars[j];
            if c == ' ' {
                if in_leading_spaces {
                    spaces += 1;
                    continue;
                }
                break;
            }
            in_leading_spaces = false;

            let candidate: String = chars[j..=cursor - spaces].iter().collect();
            if let Some(requires_space) = self.points.lookup(&candidate) {
                if !requires_space || spaces > 0 {
                    debug!(token = %candidate, offset = after, "trigger point matched");
                    return Some(TriggerMatch {
                        token: candidate,
                        offset: after,
                    });
                }
            }
            i += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> TriggerScanner {
        TriggerScanner::new(Arc::new(TriggerPoints::bundled().expect("bundled table")))
    }

    #[test]
    fn bundled_table_loads_with_sane_bounds() {
        let points = TriggerPoints::bundled().expect("bundled table");
        assert_eq!(points.lookup("while"), Some(true));
        assert_eq!(points.lookup("."), Some(false));
        assert_eq!(points.lookup("unknown"), None);
        assert!(points.max_no_space_len() <= points.max_len());
        assert_eq!(points.max_no_space_len(), 2);
    }

    #[test]
    fn enforce_space_token_fires_after_a_space() {
        // cursor sits on the space the user just typed
        let m = scanner().scan("while \n", 5).expect("match");
        assert_eq!(m.token, "while");
        assert_eq!(m.offset, 6);
    }

    #[test]
    fn enforce_space_token_without_space_does_not_fire() {
        assert_eq!(scanner().scan("while", 4), None);
    }

    #[test]
    fn no_space_token_fires_immediately() {
        let m = scanner().scan("foo.", 3).expect("match");
        assert_eq!(m.token, ".");
        assert_eq!(m.offset, 4);
    }

    #[test]
    fn shortest_window_wins_over_longer_suffix() {
        // "for " ends in the registered token "or"; the shortest growing
        // window matches first, so the scan reports "or", not "for"
        let m = scanner().scan("for \n", 3).expect("match");
        assert_eq!(m.token, "or");
    }

    #[test]
    fn multiple_trailing_spaces_are_skipped_as_one_run() {
        let m = scanner().scan("while   ", 7).expect("match");
        assert_eq!(m.token, "while");
        assert_eq!(m.offset, 8);
    }

    #[test]
    fn interior_space_stops_the_scan() {
        // backward scan stops at the space between "b" and "a"
        assert_eq!(scanner().scan("a b ", 3), None);
    }

    #[test]
    fn cursor_must_sit_at_end_of_line() {
        assert_eq!(scanner().scan("while x", 5), None);
        assert!(scanner().scan("while \nx", 5).is_some());
    }

    #[test]
    fn blank_buffer_never_fires() {
        assert_eq!(scanner().scan("   ", 1), None);
        assert_eq!(scanner().scan("", 0), None);
    }

    #[test]
    fn cursor_out_of_bounds_never_fires() {
        assert_eq!(scanner().scan("while ", 17), None);
    }

    #[test]
    fn unregistered_word_does_not_fire() {
        assert_eq!(scanner().scan("banana \n", 6), None);
    }
}
