use serde::Serialize;

use crate::models::MedicationError;

/// Medications picked for a check, in the order they were added. An id can
/// appear at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MedicationSelection {
    ids: Vec<u32>,
}

impl MedicationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection, keeping the first occurrence of each id.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut selection = Self::new();
        for id in ids {
            let _ = selection.add(id);
        }
        selection
    }

    pub fn add(&mut self, id: u32) -> Result<(), MedicationError> {
        if self.contains(id) {
            return Err(MedicationError::AlreadySelected(id));
        }
        self.ids.push(id);
        Ok(())
    }

    /// Returns whether the id was present.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| *selected != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
