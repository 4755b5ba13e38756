use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{AthleteId, PlanEntry};

/// In-memory plan entries keyed by `(planDate, athleteId)`
#[derive(Debug, Default, Clone)]
pub struct PlanStore {
    entries: HashMap<(NaiveDate, AthleteId), PlanEntry>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and load `entries`; a later duplicate key wins
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = PlanEntry>) {
        self.entries.clear();
        for entry in entries {
            self.upsert(entry);
        }
    }

    pub fn upsert(&mut self, entry: PlanEntry) {
        self.entries.insert((entry.plan_date, entry.athlete_id), entry);
    }

    /// Entry for `date` and `athlete`; no athlete context means no entry
    pub fn get(&self, date: NaiveDate, athlete: Option<AthleteId>) -> Option<&PlanEntry> {
        athlete.and_then(|id| self.entries.get(&(date, id)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by date then athlete
    pub fn sorted(&self) -> Vec<&PlanEntry> {
        let mut entries: Vec<&PlanEntry> = self.entries.values().collect();
        entries.sort_by_key(|e| (e.plan_date, e.athlete_id));
        entries
    }
}
