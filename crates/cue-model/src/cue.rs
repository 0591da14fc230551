//! Cue and cue list types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a cue, unique within its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueId(pub u64);

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub id: CueId,

    /// Start time in seconds.
    pub start: f64,

    /// End time in seconds.
    pub end: f64,

    /// Displayed text. Edits may leave this empty.
    pub text: String,
}

/// One edge of a cue's time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBound {
    Start,
    End,
}

impl Cue {
    pub fn new(id: u64, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id: CueId(id),
            start,
            end,
            text: text.into(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether `t` lies within `[start, end]`, inclusive on both ends.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Whether the text has nothing printable.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn bound(&self, bound: TimeBound) -> f64 {
        match bound {
            TimeBound::Start => self.start,
            TimeBound::End => self.end,
        }
    }

    /// `0 <= start < end`, the only invariant enforced on edited cues.
    pub fn has_valid_span(&self) -> bool {
        self.start >= 0.0 && self.start < self.end
    }
}

/// Cues ordered by start time.
///
/// Overlaps and gaps introduced by edits are tolerated; lookups resolve
/// ambiguity by list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueList {
    cues: Vec<Cue>,
}

impl CueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn as_slice(&self) -> &[Cue] {
        &self.cues
    }

    pub fn get(&self, id: CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CueId) -> Option<&mut Cue> {
        self.cues.iter_mut().find(|c| c.id == id)
    }

    pub fn ids(&self) -> Vec<CueId> {
        self.cues.iter().map(|c| c.id).collect()
    }

    /// First cue in list order whose span contains `t`.
    ///
    /// At an exact boundary shared by two adjacent cues the earlier one wins.
    pub fn first_active_at(&self, t: f64) -> Option<&Cue> {
        self.cues.iter().find(|c| c.contains(t))
    }

    /// End of the last cue, or zero for an empty list.
    pub fn span_end(&self) -> f64 {
        self.cues.iter().map(|c| c.end).fold(0.0, f64::max)
    }

    pub fn into_vec(self) -> Vec<Cue> {
        self.cues
    }
}

impl From<Vec<Cue>> for CueList {
    fn from(mut cues: Vec<Cue>) -> Self {
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { cues }
    }
}

impl<'a> IntoIterator for &'a CueList {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cues() -> CueList {
        CueList::from(vec![Cue::new(0, 0.0, 2.0, "a"), Cue::new(1, 2.0, 4.0, "b")])
    }

    #[test]
    fn test_boundary_tie_resolved_by_order() {
        let list = two_cues();
        assert_eq!(list.first_active_at(2.0).map(|c| c.id), Some(CueId(0)));
        assert_eq!(list.first_active_at(2.01).map(|c| c.id), Some(CueId(1)));
        assert_eq!(list.first_active_at(4.0).map(|c| c.id), Some(CueId(1)));
    }

    #[test]
    fn test_no_active_cue_outside_spans() {
        let list = CueList::from(vec![Cue::new(0, 1.0, 2.0, "a"), Cue::new(1, 3.0, 4.0, "b")]);
        assert!(list.first_active_at(0.5).is_none());
        assert!(list.first_active_at(2.5).is_none());
        assert!(list.first_active_at(4.5).is_none());
        assert!(CueList::new().first_active_at(0.0).is_none());
    }

    #[test]
    fn test_overlap_prefers_list_order() {
        let list = CueList::from(vec![Cue::new(5, 0.0, 3.0, "a"), Cue::new(9, 1.0, 2.0, "b")]);
        assert_eq!(list.first_active_at(1.5).map(|c| c.id), Some(CueId(5)));
    }

    #[test]
    fn test_from_vec_orders_by_start() {
        let list = CueList::from(vec![Cue::new(1, 2.0, 4.0, "b"), Cue::new(0, 0.0, 2.0, "a")]);
        assert_eq!(list.ids(), vec![CueId(0), CueId(1)]);
        assert!((list.span_end() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_blank_and_span_checks() {
        let mut cue = Cue::new(0, 1.0, 1.0, "  ");
        assert!(cue.is_blank());
        assert!(!cue.has_valid_span());
        cue.end = 1.5;
        assert!(cue.has_valid_span());
        assert!((cue.duration() - 0.5).abs() < 1e-9);
        assert_eq!(cue.bound(TimeBound::End), 1.5);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let json = serde_json::to_string(&two_cues()).unwrap();
        assert!(json.starts_with("[{\"id\":0,"));
        let parsed: CueList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, two_cues());
    }
}
