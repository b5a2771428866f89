use crate::predictor::interface::PredictionSet;
use crate::upload::image_meta::FileMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub date: DateTime<Utc>,
    pub meta: Option<FileMeta>,
    pub result: PredictionSet,
}

/// Most-recent-first list of finished analyses. Pushing past capacity drops
/// the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    capacity: usize,
    next_id: u64,
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: 1,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(
        &mut self,
        date: DateTime<Utc>,
        meta: Option<FileMeta>,
        result: PredictionSet,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(HistoryEntry {
            id,
            date,
            meta,
            result,
        });
        self.entries.truncate(self.capacity);

        id
    }

    pub fn get(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
