// Local state kept in a sled embedded database

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::PathBuf;

use crate::models::{AthleteId, CoachId};

const RESEND_TREE: &str = "resend_counters";

/// Link requests a coach may resend to one athlete per calendar day
pub const DAILY_RESEND_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct ResendCounter {
    date: NaiveDate,
    count: u32,
}

/// Storage manager for local embedded database
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Database directory (~/.athlete-results/state)
    pub fn db_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("ATHLETE_RESULTS_DB_PATH") {
            return Ok(PathBuf::from(path));
        }

        Ok(crate::config::Config::config_dir()?.join("state"))
    }

    pub fn init() -> Result<Self> {
        Self::init_with_path(Self::db_path()?)
    }

    pub fn init_with_path(path: PathBuf) -> Result<Self> {
        tracing::debug!("Opening sled database at {:?}", path);

        let db = sled::open(&path).context("Failed to open sled database")?;

        Ok(Self { db })
    }

    fn resend_key(coach_id: CoachId, athlete_id: AthleteId) -> String {
        format!("{}:{}", coach_id, athlete_id)
    }

    fn resend_counter(&self, coach_id: CoachId, athlete_id: AthleteId) -> Result<Option<ResendCounter>> {
        let tree = self
            .db
            .open_tree(RESEND_TREE)
            .context("Failed to open resend counter tree")?;

        let key = Self::resend_key(coach_id, athlete_id);
        match tree.get(key.as_bytes()).context("Failed to read resend counter")? {
            Some(value) => {
                let counter: ResendCounter =
                    bincode::deserialize(&value).context("Failed to deserialize resend counter")?;
                Ok(Some(counter))
            }
            None => Ok(None),
        }
    }

    /// Resends left for `today`; a counter from an earlier day no longer counts
    pub fn remaining_resends(
        &self,
        coach_id: CoachId,
        athlete_id: AthleteId,
        today: NaiveDate,
    ) -> Result<u32> {
        let used = match self.resend_counter(coach_id, athlete_id)? {
            Some(counter) if counter.date == today => counter.count,
            _ => 0,
        };

        Ok(DAILY_RESEND_LIMIT.saturating_sub(used))
    }

    /// Count one successful resend and return how many are left today
    pub fn record_resend(
        &self,
        coach_id: CoachId,
        athlete_id: AthleteId,
        today: NaiveDate,
    ) -> Result<u32> {
        let count = match self.resend_counter(coach_id, athlete_id)? {
            Some(counter) if counter.date == today => counter.count + 1,
            _ => 1,
        };

        let tree = self
            .db
            .open_tree(RESEND_TREE)
            .context("Failed to open resend counter tree")?;

        let value = bincode::serialize(&ResendCounter { date: today, count })
            .context("Failed to serialize resend counter")?;

        tree.insert(Self::resend_key(coach_id, athlete_id).as_bytes(), value)
            .context("Failed to store resend counter")?;

        self.db.flush().context("Failed to flush database")?;

        tracing::debug!(
            "Coach {} resent request to athlete {} ({} today)",
            coach_id,
            athlete_id,
            count
        );
        Ok(DAILY_RESEND_LIMIT.saturating_sub(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_fresh_pair_has_full_allowance() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::init_with_path(dir.path().join("db"))?;

        assert_eq!(storage.remaining_resends(7, 101, date("2024-06-05"))?, 3);
        Ok(())
    }

    #[test]
    fn test_limit_reached_after_three() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::init_with_path(dir.path().join("db"))?;
        let today = date("2024-06-05");

        assert_eq!(storage.record_resend(7, 101, today)?, 2);
        assert_eq!(storage.record_resend(7, 101, today)?, 1);
        assert_eq!(storage.record_resend(7, 101, today)?, 0);
        assert_eq!(storage.remaining_resends(7, 101, today)?, 0);

        // other athletes of the same coach are counted separately
        assert_eq!(storage.remaining_resends(7, 102, today)?, 3);
        Ok(())
    }

    #[test]
    fn test_counter_resets_next_day() -> Result<()> {
        let dir = tempdir()?;
        let storage = Storage::init_with_path(dir.path().join("db"))?;

        for _ in 0..3 {
            storage.record_resend(7, 101, date("2024-06-05"))?;
        }

        assert_eq!(storage.remaining_resends(7, 101, date("2024-06-06"))?, 3);
        assert_eq!(storage.record_resend(7, 101, date("2024-06-06"))?, 2);
        Ok(())
    }

    #[test]
    fn test_counters_survive_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("db");
        let today = date("2024-06-05");

        {
            let storage = Storage::init_with_path(path.clone())?;
            storage.record_resend(7, 101, today)?;
        }

        let storage = Storage::init_with_path(path)?;
        assert_eq!(storage.remaining_resends(7, 101, today)?, 2);
        Ok(())
    }
}
