use chrono::NaiveDate;
use thiserror::Error;

use crate::api::ApiError;
use crate::models::AthleteId;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Missing coach id or athlete id")]
    MissingIdentity,

    #[error("You are not logged in. Please log in again.")]
    NotLoggedIn,

    #[error("Select at least one athlete")]
    NoAthletesSelected,

    #[error("Select at least one day")]
    NoDaysSelected,

    #[error("Read-only mode.")]
    ReadOnly,

    #[error("Only available when managing plans as a coach")]
    NotCoachMode,

    #[error("{0} is not in the selected week")]
    DateOutsideWeek(NaiveDate),

    #[error("Athlete {0} is not on the roster")]
    UnknownAthlete(AthleteId),

    #[error("Failed to load {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Failed to {what} for {date}: {source}")]
    Write {
        what: &'static str,
        date: NaiveDate,
        #[source]
        source: ApiError,
    },
}

impl PlanError {
    pub(crate) fn fetch(what: &'static str) -> impl FnOnce(ApiError) -> PlanError {
        move |source| match source {
            ApiError::NotLoggedIn => PlanError::NotLoggedIn,
            source => PlanError::Fetch { what, source },
        }
    }

    pub(crate) fn write(what: &'static str, date: NaiveDate) -> impl FnOnce(ApiError) -> PlanError {
        move |source| match source {
            ApiError::NotLoggedIn => PlanError::NotLoggedIn,
            source => PlanError::Write { what, date, source },
        }
    }

    /// Errors that end the view instead of being shown as a notice
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlanError::MissingIdentity | PlanError::NotLoggedIn)
    }
}
