//! Which of the four weekly plan views a page load opens.
//!
//! Precedence: Preview, then Coach, then the athlete views, then error.
//! The two athlete views are told apart by whether the athlete has an
//! accepted coach, which needs a remote lookup; [`ViewParams::classify`]
//! returns [`ModeDecision::NeedsRelationCheck`] in that case.

use crate::models::{AthleteId, CoachId};

use super::error::PlanError;

/// Identifiers the view is opened with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::Args)]
pub struct ViewParams {
    /// Athlete whose plan to open
    #[arg(long)]
    pub athlete_id: Option<AthleteId>,

    /// Coach managing the plans
    #[arg(long)]
    pub coach_id: Option<CoachId>,

    /// Open an athlete's plan read-only on behalf of a coach
    #[arg(long)]
    pub readonly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Coach editing plans for the roster, optionally focused on one athlete
    Coach {
        coach_id: CoachId,
        athlete_id: Option<AthleteId>,
    },
    /// Athlete with an accepted coach; the coach owns the plan
    AthleteManaged { athlete_id: AthleteId },
    /// Athlete without a coach, editing their own plan
    AthleteSolo { athlete_id: AthleteId },
    /// Read-only look at an athlete's plan
    Preview {
        athlete_id: AthleteId,
        coach_id: CoachId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeDecision {
    Resolved(ViewMode),
    NeedsRelationCheck(AthleteId),
}

impl ModeDecision {
    /// Complete the decision with the result of the relation check
    pub fn finish(self, has_coach: bool) -> ViewMode {
        match self {
            ModeDecision::Resolved(mode) => mode,
            ModeDecision::NeedsRelationCheck(athlete_id) if has_coach => {
                ViewMode::AthleteManaged { athlete_id }
            }
            ModeDecision::NeedsRelationCheck(athlete_id) => ViewMode::AthleteSolo { athlete_id },
        }
    }
}

impl ViewParams {
    pub fn classify(&self) -> Result<ModeDecision, PlanError> {
        match (self.athlete_id, self.coach_id, self.readonly) {
            (Some(athlete_id), Some(coach_id), true) => Ok(ModeDecision::Resolved(
                ViewMode::Preview {
                    athlete_id,
                    coach_id,
                },
            )),
            (athlete_id, Some(coach_id), _) => Ok(ModeDecision::Resolved(ViewMode::Coach {
                coach_id,
                athlete_id,
            })),
            (Some(athlete_id), None, _) => Ok(ModeDecision::NeedsRelationCheck(athlete_id)),
            (None, None, _) => Err(PlanError::MissingIdentity),
        }
    }

    /// Resolve with a known relation-check result
    pub fn resolve(&self, has_coach: bool) -> Result<ViewMode, PlanError> {
        Ok(self.classify()?.finish(has_coach))
    }
}

impl ViewMode {
    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Coach {
                athlete_id: Some(_),
                ..
            } => "Coach Editing Single Athlete",
            ViewMode::Coach { .. } => "Coach Plan Manager",
            ViewMode::AthleteManaged { .. } => "Athlete Weekly Plan (Coach-managed)",
            ViewMode::AthleteSolo { .. } => "Solo Athlete Weekly Plan (Editable)",
            ViewMode::Preview { .. } => "Athlete Weekly Plan (Preview)",
        }
    }

    pub fn is_coach(&self) -> bool {
        matches!(self, ViewMode::Coach { .. })
    }

    /// Cells are text inputs rather than static text
    pub fn is_editable(&self) -> bool {
        matches!(self, ViewMode::Coach { .. } | ViewMode::AthleteSolo { .. })
    }

    /// The send buttons are shown
    pub fn shows_actions(&self) -> bool {
        self.is_editable()
    }

    /// A coach managing the whole roster has nowhere to go back to
    pub fn shows_back(&self) -> bool {
        !matches!(
            self,
            ViewMode::Coach {
                athlete_id: None,
                ..
            }
        )
    }

    /// Athlete the page was opened for, if any
    pub fn athlete_id(&self) -> Option<AthleteId> {
        match *self {
            ViewMode::Coach { athlete_id, .. } => athlete_id,
            ViewMode::AthleteManaged { athlete_id }
            | ViewMode::AthleteSolo { athlete_id }
            | ViewMode::Preview { athlete_id, .. } => Some(athlete_id),
        }
    }

    pub fn coach_id(&self) -> Option<CoachId> {
        match *self {
            ViewMode::Coach { coach_id, .. } | ViewMode::Preview { coach_id, .. } => Some(coach_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Outcome {
        Coach,
        Managed,
        Solo,
        Preview,
        Error,
    }

    fn outcome(params: ViewParams, has_coach: bool) -> Outcome {
        match params.resolve(has_coach) {
            Ok(ViewMode::Coach { .. }) => Outcome::Coach,
            Ok(ViewMode::AthleteManaged { .. }) => Outcome::Managed,
            Ok(ViewMode::AthleteSolo { .. }) => Outcome::Solo,
            Ok(ViewMode::Preview { .. }) => Outcome::Preview,
            Err(PlanError::MissingIdentity) => Outcome::Error,
            Err(e) => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn test_every_combination_selects_exactly_one_mode() {
        for athlete in [None, Some(5)] {
            for coach in [None, Some(7)] {
                for readonly in [false, true] {
                    for has_coach in [false, true] {
                        let params = ViewParams {
                            athlete_id: athlete,
                            coach_id: coach,
                            readonly,
                        };
                        let expected = if athlete.is_some() && coach.is_some() && readonly {
                            Outcome::Preview
                        } else if coach.is_some() {
                            Outcome::Coach
                        } else if athlete.is_some() && has_coach {
                            Outcome::Managed
                        } else if athlete.is_some() {
                            Outcome::Solo
                        } else {
                            Outcome::Error
                        };
                        assert_eq!(outcome(params, has_coach), expected, "{:?} {}", params, has_coach);
                    }
                }
            }
        }
    }

    #[test]
    fn test_relation_check_only_for_athlete_pages() {
        let coach = ViewParams {
            athlete_id: Some(5),
            coach_id: Some(7),
            readonly: false,
        };
        assert!(matches!(coach.classify(), Ok(ModeDecision::Resolved(_))));

        let athlete = ViewParams {
            athlete_id: Some(5),
            ..Default::default()
        };
        assert_eq!(athlete.classify().unwrap(), ModeDecision::NeedsRelationCheck(5));
    }

    #[test]
    fn test_readonly_without_coach_is_athlete_view() {
        let params = ViewParams {
            athlete_id: Some(5),
            coach_id: None,
            readonly: true,
        };
        assert_eq!(
            params.resolve(false).unwrap(),
            ViewMode::AthleteSolo { athlete_id: 5 }
        );
    }

    #[test]
    fn test_mode_presentation() {
        let manager = ViewMode::Coach {
            coach_id: 7,
            athlete_id: None,
        };
        assert_eq!(manager.title(), "Coach Plan Manager");
        assert!(manager.is_editable());
        assert!(!manager.shows_back());

        let preview = ViewMode::Preview {
            athlete_id: 5,
            coach_id: 7,
        };
        assert!(!preview.is_editable());
        assert!(!preview.shows_actions());
        assert_eq!(preview.athlete_id(), Some(5));
    }
}
