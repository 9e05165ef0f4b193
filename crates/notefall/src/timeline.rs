//! Note timeline.
//!
//! Holds the immutable, time-ordered note list of a session and answers
//! visibility and expiry queries against the lifecycle tracker. Queries have
//! no side effects.

use std::collections::HashMap;
use std::sync::Arc;

use crate::chart::{Note, NoteId};
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleTracker, NotePhase};

#[derive(Debug, Clone)]
pub struct NoteTimeline {
    notes: Arc<[Note]>,
    index: HashMap<NoteId, usize>,
}

impl NoteTimeline {
    /// Build a timeline, rejecting inconsistent note data.
    ///
    /// Notes are ordered by time (stable for equal times). A note may not lie
    /// beyond `song_duration_ms` when one is given.
    pub fn new(mut notes: Vec<Note>, lane_count: u8, song_duration_ms: Option<f64>) -> Result<Self> {
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut index = HashMap::with_capacity(notes.len());
        for (i, note) in notes.iter().enumerate() {
            note.validate(lane_count)?;
            if let Some(limit) = song_duration_ms
                && note.time_ms() > limit
            {
                return Err(Error::InvalidInput(format!(
                    "note {} at {}ms is past the song end ({}ms)",
                    note.id,
                    note.time_ms(),
                    limit
                )));
            }
            if index.insert(note.id.clone(), i).is_some() {
                return Err(Error::InvalidInput(format!("duplicate note id {}", note.id)));
            }
        }

        Ok(Self {
            notes: notes.into(),
            index,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.index.get(id).map(|&i| &self.notes[i])
    }

    /// Position of the first note whose instant is not before `ms`
    fn lower_bound(&self, ms: f64) -> usize {
        self.notes.partition_point(|n| n.time_ms() < ms)
    }

    /// Notes entering the fall window: instant within `[now, now + fall]`, still pending.
    pub fn visible_window<'a>(
        &'a self,
        now_ms: f64,
        fall_duration_ms: f64,
        tracker: &'a LifecycleTracker,
    ) -> impl Iterator<Item = &'a Note> + 'a {
        let start = self.lower_bound(now_ms);
        let end = self.notes.partition_point(|n| n.time_ms() <= now_ms + fall_duration_ms);
        self.notes[start..end.max(start)]
            .iter()
            .filter(move |n| tracker.phase(&n.id) == NotePhase::Pending)
    }

    /// Pending notes whose instant already passed without ever becoming visible
    pub fn overdue<'a>(
        &'a self,
        now_ms: f64,
        tracker: &'a LifecycleTracker,
    ) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes[..self.lower_bound(now_ms)]
            .iter()
            .filter(move |n| tracker.phase(&n.id) == NotePhase::Pending)
    }

    /// Visible notes strictly more than `miss_threshold_ms` past their instant.
    ///
    /// Held long notes are exempt; see [`NoteTimeline::abandoned_holds`].
    pub fn expired(
        &self,
        now_ms: f64,
        miss_threshold_ms: f64,
        tracker: &LifecycleTracker,
    ) -> Vec<NoteId> {
        self.notes[..self.lower_bound(now_ms - miss_threshold_ms)]
            .iter()
            .filter(|n| now_ms - n.time_ms() > miss_threshold_ms)
            .filter(|n| tracker.phase(&n.id) == NotePhase::Visible)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Held long notes whose end time is strictly more than `miss_threshold_ms` behind
    pub fn abandoned_holds(
        &self,
        now_ms: f64,
        miss_threshold_ms: f64,
        tracker: &LifecycleTracker,
    ) -> Vec<NoteId> {
        let mut ids: Vec<(usize, NoteId)> = tracker
            .active_ids()
            .filter(|id| matches!(tracker.phase(id), NotePhase::Holding { .. }))
            .filter_map(|id| self.index.get(id).map(|&i| (i, id.clone())))
            .filter(|(i, _)| now_ms - self.notes[*i].end_time_ms() > miss_threshold_ms)
            .collect();
        ids.sort_by_key(|(i, _)| *i);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Active notes in a lane that can take a press (held notes excluded), in time order
    pub fn pressable_in_lane<'a>(
        &'a self,
        lane: u8,
        tracker: &'a LifecycleTracker,
    ) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes
            .iter()
            .filter(move |n| n.lane == lane && tracker.phase(&n.id) == NotePhase::Visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::JudgementOutcome;

    fn timeline() -> NoteTimeline {
        NoteTimeline::new(
            vec![
                Note::normal("c", 3.0, 2),
                Note::normal("a", 1.0, 0),
                Note::long("b", 2.0, 1, 1.0),
            ],
            4,
            Some(10_000.0),
        )
        .unwrap()
    }

    fn ids<'a>(notes: impl Iterator<Item = &'a Note>) -> Vec<&'a str> {
        notes.map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_new_orders_by_time() {
        let timeline = timeline();
        assert_eq!(ids(timeline.notes().iter()), vec!["a", "b", "c"]);
        assert_eq!(timeline.get(&NoteId::new("b")).unwrap().lane, 1);
    }

    #[test]
    fn test_new_rejects_invalid_data() {
        let dup = vec![Note::normal("a", 1.0, 0), Note::normal("a", 2.0, 0)];
        assert!(matches!(
            NoteTimeline::new(dup, 4, None),
            Err(Error::InvalidInput(_))
        ));

        let late = vec![Note::normal("a", 11.0, 0)];
        assert!(NoteTimeline::new(late, 4, Some(10_000.0)).is_err());

        let lane = vec![Note::normal("a", 1.0, 5)];
        assert!(NoteTimeline::new(lane, 4, None).is_err());
    }

    #[test]
    fn test_visible_window_bounds() {
        let timeline = timeline();
        let tracker = LifecycleTracker::new();
        assert_eq!(ids(timeline.visible_window(0.0, 1000.0, &tracker)), vec!["a"]);
        assert_eq!(ids(timeline.visible_window(0.0, 2000.0, &tracker)), vec!["a", "b"]);
        assert_eq!(ids(timeline.visible_window(1000.0, 1000.0, &tracker)), vec!["a", "b"]);
        assert!(ids(timeline.visible_window(1000.1, 500.0, &tracker)).is_empty());
    }

    #[test]
    fn test_visible_window_skips_tracked() {
        let timeline = timeline();
        let mut tracker = LifecycleTracker::new();
        tracker.mark_visible(&timeline.notes()[0]);
        assert_eq!(ids(timeline.visible_window(0.0, 2500.0, &tracker)), vec!["b"]);
    }

    #[test]
    fn test_overdue() {
        let timeline = timeline();
        let mut tracker = LifecycleTracker::new();
        assert_eq!(ids(timeline.overdue(2500.0, &tracker)), vec!["a", "b"]);
        tracker.mark_visible(&timeline.notes()[0]);
        assert_eq!(ids(timeline.overdue(2500.0, &tracker)), vec!["b"]);
    }

    #[test]
    fn test_expired_strict_threshold() {
        let timeline = timeline();
        let mut tracker = LifecycleTracker::new();
        for note in timeline.notes() {
            tracker.mark_visible(note);
        }
        assert!(timeline.expired(1700.0, 700.0, &tracker).is_empty());
        assert_eq!(timeline.expired(1716.0, 700.0, &tracker), vec![NoteId::new("a")]);
        assert_eq!(timeline.expired(3800.0, 700.0, &tracker).len(), 3);
    }

    #[test]
    fn test_expired_skips_holding_and_resolved() {
        let timeline = timeline();
        let mut tracker = LifecycleTracker::new();
        for note in timeline.notes() {
            tracker.mark_visible(note);
        }
        tracker.start_hold(&timeline.notes()[1], 2000.0).unwrap();
        tracker
            .resolve(JudgementOutcome::missed(NoteId::new("c")))
            .unwrap();

        assert_eq!(timeline.expired(5000.0, 700.0, &tracker), vec![NoteId::new("a")]);
        assert!(timeline.abandoned_holds(3700.0, 700.0, &tracker).is_empty());
        assert_eq!(
            timeline.abandoned_holds(3701.0, 700.0, &tracker),
            vec![NoteId::new("b")]
        );
    }

    #[test]
    fn test_pressable_in_lane() {
        let timeline = timeline();
        let mut tracker = LifecycleTracker::new();
        assert_eq!(timeline.pressable_in_lane(1, &tracker).count(), 0);
        for note in timeline.notes() {
            tracker.mark_visible(note);
        }
        assert_eq!(ids(timeline.pressable_in_lane(1, &tracker)), vec!["b"]);
        tracker.start_hold(&timeline.notes()[1], 2000.0).unwrap();
        assert_eq!(timeline.pressable_in_lane(1, &tracker).count(), 0);
    }
}
