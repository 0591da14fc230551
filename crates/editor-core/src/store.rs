//! Edit store: the current cue list plus the selected-cue pointer.
//!
//! The store applies edits verbatim. Range checks and clamping belong to
//! the caller (see [`crate::nudge`] and the controller).

use cuesmith_common::error::{CuesmithError, CuesmithResult};
use cuesmith_cue_model::cue::{Cue, CueId, CueList, TimeBound};

use crate::nudge::nudge_bound;

#[derive(Debug, Clone, Default)]
pub struct CueStore {
    cues: CueList,
    selected: Option<CueId>,
}

impl CueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list. Selection is cleared.
    pub fn replace_all(&mut self, cues: Vec<Cue>) {
        tracing::debug!(cues = cues.len(), "Cue list replaced");
        self.cues = CueList::from(cues);
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    pub fn cues(&self) -> &CueList {
        &self.cues
    }

    pub fn get(&self, id: CueId) -> Option<&Cue> {
        self.cues.get(id)
    }

    /// First cue in list order containing `t`, boundaries inclusive.
    pub fn active_at(&self, t: f64) -> Option<&Cue> {
        self.cues.first_active_at(t)
    }

    pub fn set_text(&mut self, id: CueId, text: impl Into<String>) -> CuesmithResult<()> {
        let cue = self.cue_mut(id)?;
        cue.text = text.into();
        Ok(())
    }

    /// Replace both bounds as given. No clamping happens here, and
    /// overlaps with neighboring cues are allowed.
    pub fn set_timing(&mut self, id: CueId, start: f64, end: f64) -> CuesmithResult<()> {
        let cue = self.cue_mut(id)?;
        cue.start = start;
        cue.end = end;
        tracing::debug!(%id, start, end, "Cue timing updated");
        Ok(())
    }

    /// Shift one bound by `delta` with the clamping rules of [`nudge_bound`].
    /// A cue with no room left for that bound is left unchanged.
    pub fn nudge(
        &mut self,
        id: CueId,
        bound: TimeBound,
        delta: f64,
        total_duration: Option<f64>,
        min_cue_secs: f64,
    ) -> CuesmithResult<(f64, f64)> {
        let cue = self.get(id).ok_or(CuesmithError::CueNotFound { id: id.0 })?;
        let (start, end) = nudge_bound(cue, bound, delta, total_duration, min_cue_secs).ok_or(
            CuesmithError::InvalidTiming {
                start: cue.start,
                end: cue.end,
            },
        )?;
        self.set_timing(id, start, end)?;
        Ok((start, end))
    }

    pub fn select(&mut self, id: CueId) -> CuesmithResult<()> {
        if self.cues.get(id).is_none() {
            return Err(CuesmithError::CueNotFound { id: id.0 });
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<CueId> {
        self.selected
    }

    fn cue_mut(&mut self, id: CueId) -> CuesmithResult<&mut Cue> {
        self.cues
            .get_mut(id)
            .ok_or(CuesmithError::CueNotFound { id: id.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CueStore {
        let mut store = CueStore::new();
        store.replace_all(vec![
            Cue::new(0, 0.0, 2.0, "first"),
            Cue::new(1, 2.0, 4.0, "second"),
        ]);
        store
    }

    #[test]
    fn test_active_lookup_uses_list_order_at_boundary() {
        let store = store();
        assert_eq!(store.active_at(2.0).map(|c| c.id), Some(CueId(0)));
        assert_eq!(store.active_at(3.0).map(|c| c.id), Some(CueId(1)));
        assert!(store.active_at(4.5).is_none());
    }

    #[test]
    fn test_set_text_verbatim() {
        let mut store = store();
        store.set_text(CueId(1), "").unwrap();
        assert_eq!(store.get(CueId(1)).unwrap().text, "");
        store.set_text(CueId(1), "  spaced  ").unwrap();
        assert_eq!(store.get(CueId(1)).unwrap().text, "  spaced  ");
    }

    #[test]
    fn test_set_timing_allows_overlap() {
        let mut store = store();
        store.set_timing(CueId(0), 0.5, 3.0).unwrap();
        let cue = store.get(CueId(0)).unwrap();
        assert_eq!((cue.start, cue.end), (0.5, 3.0));
        assert_eq!(store.active_at(2.5).map(|c| c.id), Some(CueId(0)));
    }

    #[test]
    fn test_unknown_id_reported() {
        let mut store = store();
        assert!(matches!(
            store.set_text(CueId(9), "x"),
            Err(CuesmithError::CueNotFound { id: 9 })
        ));
        assert!(store.set_timing(CueId(9), 0.0, 1.0).is_err());
        assert!(store.select(CueId(9)).is_err());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_selection_cleared_on_replace() {
        let mut store = store();
        store.select(CueId(1)).unwrap();
        assert_eq!(store.selected(), Some(CueId(1)));
        store.replace_all(vec![Cue::new(0, 0.0, 1.0, "new")]);
        assert_eq!(store.selected(), None);
        store.clear();
        assert!(store.cues().is_empty());
    }

    #[test]
    fn test_nudge_applies_clamped_bounds() {
        let mut store = store();
        let (start, end) = store
            .nudge(CueId(1), TimeBound::End, 0.5, Some(4.2), 0.1)
            .unwrap();
        assert_eq!(start, 2.0);
        assert!((end - 4.2).abs() < 1e-9);
        assert_eq!(store.get(CueId(1)).unwrap().end, end);
    }

    #[test]
    fn test_nudge_without_room_leaves_cue() {
        let mut store = store();
        store.set_timing(CueId(1), 30.0, 40.0).unwrap();
        assert!(matches!(
            store.nudge(CueId(1), TimeBound::End, -0.5, Some(10.0), 0.1),
            Err(CuesmithError::InvalidTiming { .. })
        ));
        let cue = store.get(CueId(1)).unwrap();
        assert_eq!((cue.start, cue.end), (30.0, 40.0));
    }
}
