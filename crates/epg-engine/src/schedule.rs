//! In-memory container for the entries a view is editing.
//!
//! Backs the add/edit/delete dialogs. Nothing here is persisted.

use tracing::debug;

use crate::error::EpgError;
use crate::program::{EntryId, ProgramDraft, ProgramEntry};

/// An ordered list of entries with an id allocator.
///
/// Ids increase monotonically and are never handed out twice, even after the
/// entry holding one is removed.
#[derive(Debug, Clone)]
pub struct ProgramSchedule {
    entries: Vec<ProgramEntry>,
    /// `None` once `u64::MAX` has been handed out.
    next_id: Option<u64>,
}

impl Default for ProgramSchedule {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: Some(0),
        }
    }
}

impl ProgramSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule from existing entries. New ids start above the
    /// largest id already present.
    pub fn from_entries(entries: Vec<ProgramEntry>) -> Self {
        let next_id = match entries.iter().map(|e| e.id.0).max() {
            Some(max) => max.checked_add(1),
            None => Some(0),
        };
        Self { entries, next_id }
    }

    /// Append a new entry and return its freshly allocated id.
    ///
    /// # Errors
    ///
    /// Returns [`EpgError::IdsExhausted`] once every `u64` id has been used.
    pub fn add(&mut self, draft: ProgramDraft) -> Result<EntryId, EpgError> {
        let raw = self.next_id.ok_or(EpgError::IdsExhausted)?;
        self.next_id = raw.checked_add(1);
        let id = EntryId(raw);
        debug!(%id, title = %draft.title, "adding program entry");
        self.entries.push(ProgramEntry::from_draft(id, draft));
        Ok(id)
    }

    /// Replace the editable fields of an entry, keeping its id and position.
    pub fn update(&mut self, id: EntryId, draft: ProgramDraft) -> Result<(), EpgError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EpgError::UnknownEntry(id.to_string()))?;
        debug!(%id, "updating program entry");
        *slot = ProgramEntry::from_draft(id, draft);
        Ok(())
    }

    pub fn remove(&mut self, id: EntryId) -> Result<ProgramEntry, EpgError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EpgError::UnknownEntry(id.to_string()))?;
        debug!(%id, "removing program entry");
        Ok(self.entries.remove(index))
    }

    pub fn get(&self, id: EntryId) -> Option<&ProgramEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ProgramEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
