//! Ordered stop collection
//!
//! Every operation returns a new sequence; the receiver is left untouched so
//! the caller decides when to publish the result. After every operation the
//! stops carry `sequence_no` 1..N in order, with no gaps or duplicates.

use crate::error::{Error, Result};
use crate::stop::{Stop, StopId, StopPatch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, warn};

/// The ordered stops of one tour draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopSequence {
    stops: Vec<Stop>,
}

impl StopSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the tour form's persisted stops
    ///
    /// Stops are ordered by their stored `sequence_no` (ties keep input
    /// order) and renumbered, so gaps left by the backend are closed. A
    /// repeated id keeps its first holder; later holders get a temporary id.
    pub fn from_stops(mut stops: Vec<Stop>) -> Self {
        stops.sort_by_key(|s| s.sequence_no);

        let mut seen = HashSet::new();
        for stop in stops.iter_mut() {
            if !seen.insert(stop.id.clone()) {
                let replacement = StopId::temporary();
                warn!("Duplicate stop id {}; reassigned {}", stop.id, replacement);
                stop.id = replacement;
            }
        }
        Self::renumbered(stops)
    }

    fn renumbered(mut stops: Vec<Stop>) -> Self {
        for (index, stop) in stops.iter_mut().enumerate() {
            stop.sequence_no = index as u32 + 1;
        }
        Self { stops }
    }

    /// Append a stop with `sequence_no = len + 1`
    pub fn insert(&self, stop: Stop) -> Self {
        let mut stops = self.stops.clone();
        stops.push(stop);
        Self::renumbered(stops)
    }

    /// Insert a stop at `index` (clamped to the end) and renumber
    pub fn insert_at(&self, index: usize, stop: Stop) -> Self {
        let mut stops = self.stops.clone();
        stops.insert(index.min(stops.len()), stop);
        Self::renumbered(stops)
    }

    /// Remove a stop and renumber the rest by their prior relative order
    ///
    /// Unknown ids are a no-op.
    pub fn remove(&self, id: &StopId) -> Self {
        if self.get(id).is_none() {
            debug!("remove: no stop with id {}", id);
            return self.clone();
        }
        let stops = self
            .stops
            .iter()
            .filter(|s| &s.id != id)
            .cloned()
            .collect();
        Self::renumbered(stops)
    }

    /// Replace fields on one stop without touching its position
    ///
    /// Unknown ids are a no-op.
    pub fn update(&self, id: &StopId, patch: &StopPatch) -> Self {
        let mut next = self.clone();
        match next.stops.iter_mut().find(|s| &s.id == id) {
            Some(stop) => patch.apply(stop),
            None => debug!("update: no stop with id {}", id),
        }
        next
    }

    /// Adopt an externally supplied order (e.g. a drag-and-drop result)
    ///
    /// `new_order` must contain exactly the stops currently in the sequence.
    /// Anything else is rejected with [`Error::ReorderMismatch`] and the
    /// caller keeps the current sequence.
    pub fn reorder(&self, new_order: Vec<Stop>) -> Result<Self> {
        let mut expected: Vec<&StopId> = self.stops.iter().map(|s| &s.id).collect();
        let mut given: Vec<&StopId> = new_order.iter().map(|s| &s.id).collect();
        expected.sort();
        given.sort();

        if expected != given {
            let message = format!(
                "expected a permutation of {} stops, got {} entries with ids {:?}",
                expected.len(),
                given.len(),
                given
            );
            error!("reorder rejected: {}", message);
            return Err(Error::ReorderMismatch(message));
        }

        Ok(Self::renumbered(new_order))
    }

    /// Reorder by id list, looking stops up in the current sequence
    pub fn reorder_ids(&self, ids: &[StopId]) -> Result<Self> {
        let mut order = Vec::with_capacity(ids.len());
        for id in ids {
            let stop = self
                .get(id)
                .ok_or_else(|| Error::ReorderMismatch(format!("unknown stop id {}", id)))?;
            order.push(stop.clone());
        }
        self.reorder(order)
    }

    pub fn get(&self, id: &StopId) -> Option<&Stop> {
        self.stops.iter().find(|s| &s.id == id)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stop> {
        self.stops.iter()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Sequence number the next appended stop receives
    pub fn next_sequence_no(&self) -> u32 {
        self.stops.len() as u32 + 1
    }

    /// True when `sequence_no` runs 1..N in storage order
    pub fn is_contiguous(&self) -> bool {
        self.stops
            .iter()
            .enumerate()
            .all(|(i, s)| s.sequence_no == i as u32 + 1)
    }
}

impl<'a> IntoIterator for &'a StopSequence {
    type Item = &'a Stop;
    type IntoIter = std::slice::Iter<'a, Stop>;

    fn into_iter(self) -> Self::IntoIter {
        self.stops.iter()
    }
}
