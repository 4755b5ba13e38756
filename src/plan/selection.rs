use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{AthleteId, RosterEntry};

/// Days a coach marked for the next batch send
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DaySelection {
    days: BTreeSet<NaiveDate>,
}

impl DaySelection {
    /// Flip `date`; returns whether it is now selected
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.days.remove(&date) {
            false
        } else {
            self.days.insert(date);
            true
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Selected days in calendar order
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }
}

/// Roster athletes picked in the dropdown, with the "all athletes" entry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AthleteSelection {
    all: bool,
    picked: BTreeSet<AthleteId>,
}

impl AthleteSelection {
    pub fn is_all(&self) -> bool {
        self.all
    }

    pub fn is_picked(&self, id: AthleteId) -> bool {
        self.picked.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        !self.all && self.picked.is_empty()
    }

    /// Flip the "all athletes" entry; turning it on picks the whole roster,
    /// turning it off clears every pick
    pub fn toggle_all(&mut self, roster: &[RosterEntry]) {
        self.all = !self.all;
        self.picked = if self.all {
            roster.iter().map(|a| a.athlete_id).collect()
        } else {
            BTreeSet::new()
        };
    }

    /// Flip one athlete; this always drops the "all athletes" entry
    pub fn toggle(&mut self, id: AthleteId) -> bool {
        self.all = false;
        if self.picked.remove(&id) {
            false
        } else {
            self.picked.insert(id);
            true
        }
    }

    /// Athletes a batch send is addressed to
    pub fn targets(&self, roster: &[RosterEntry], context: Option<AthleteId>) -> Vec<AthleteId> {
        if self.all {
            return roster.iter().map(|a| a.athlete_id).collect();
        }

        if self.picked.is_empty() {
            return context.into_iter().collect();
        }

        roster
            .iter()
            .map(|a| a.athlete_id)
            .filter(|id| self.picked.contains(id))
            .collect()
    }

    /// Athlete whose entries fill the grid
    pub fn focus(&self, roster: &[RosterEntry], context: Option<AthleteId>) -> Option<AthleteId> {
        if self.all || self.picked.is_empty() {
            return context;
        }

        roster
            .iter()
            .map(|a| a.athlete_id)
            .find(|id| self.picked.contains(id))
            .or(context)
    }
}
