//! Note lifecycle tracking.
//!
//! Each note moves `Pending -> Visible -> (Holding ->) Resolved`. The tracker
//! is the only owner of runtime note state; both the tick path and the input
//! path go through it, which keeps resolution at-most-once.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::chart::{Note, NoteId};
use crate::error::{Error, Result};
use crate::judge::JudgementOutcome;

/// Runtime phase of a note
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotePhase {
    /// Not yet inside the fall window
    Pending,
    Visible,
    /// Long note pressed and not yet released
    Holding { start_ms: f64, lane: u8 },
    Resolved,
}

impl NotePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Visible | Self::Holding { .. })
    }
}

#[derive(Debug, Default)]
pub struct LifecycleTracker {
    /// Visible and holding notes
    active: HashMap<NoteId, NotePhase>,
    resolved: HashSet<NoteId>,
    /// Held notes, oldest hold first
    hold_order: Vec<NoteId>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, id: &NoteId) -> NotePhase {
        if self.resolved.contains(id) {
            return NotePhase::Resolved;
        }
        self.active.get(id).copied().unwrap_or(NotePhase::Pending)
    }

    /// Pending -> Visible. Returns false if the note was already materialized.
    pub fn mark_visible(&mut self, note: &Note) -> bool {
        if self.resolved.contains(&note.id) || self.active.contains_key(&note.id) {
            return false;
        }
        self.active.insert(note.id.clone(), NotePhase::Visible);
        true
    }

    /// Visible -> Holding for a long note. Does not judge.
    pub fn start_hold(&mut self, note: &Note, now_ms: f64) -> Result<()> {
        if !note.is_long() {
            return Err(Error::InvalidInput(format!(
                "note {} is not a long note",
                note.id
            )));
        }
        match self.phase(&note.id) {
            NotePhase::Visible => {
                self.active.insert(
                    note.id.clone(),
                    NotePhase::Holding {
                        start_ms: now_ms,
                        lane: note.lane,
                    },
                );
                self.hold_order.push(note.id.clone());
                debug!("Hold started on {} at {}ms", note.id, now_ms);
                Ok(())
            }
            NotePhase::Resolved => Err(Error::AlreadyResolved(note.id.clone())),
            NotePhase::Pending | NotePhase::Holding { .. } => {
                Err(Error::UnknownNote(note.id.clone()))
            }
        }
    }

    /// Move an active note to Resolved and pass its outcome through.
    ///
    /// Resolving a finished note yields `AlreadyResolved` and changes nothing.
    pub fn resolve(&mut self, outcome: JudgementOutcome) -> Result<JudgementOutcome> {
        if self.resolved.contains(&outcome.note_id) {
            warn!("Ignoring second resolution of {}", outcome.note_id);
            return Err(Error::AlreadyResolved(outcome.note_id));
        }
        if self.active.remove(&outcome.note_id).is_none() {
            return Err(Error::UnknownNote(outcome.note_id));
        }
        self.hold_order.retain(|id| *id != outcome.note_id);
        self.resolved.insert(outcome.note_id.clone());
        Ok(outcome)
    }

    /// The earliest hold still running in a lane, if any
    pub fn holding_in_lane(&self, lane: u8) -> Option<(&NoteId, f64)> {
        self.hold_order.iter().find_map(|id| match self.active.get(id) {
            Some(NotePhase::Holding { start_ms, lane: l }) if *l == lane => {
                Some((id, *start_ms))
            }
            _ => None,
        })
    }

    pub fn active_ids(&self) -> impl Iterator<Item = &NoteId> {
        self.active.keys()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }

    /// Drop all runtime state (session teardown)
    pub fn clear(&mut self) {
        self.active.clear();
        self.resolved.clear();
        self.hold_order.clear();
    }
}
