use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{AthleteId, PlanField, RosterEntry};

use super::backend::PlanBackend;
use super::error::PlanError;
use super::mode::{ModeDecision, ViewMode, ViewParams};
use super::render::{render_week, Drafts, RenderContext, WeekView};
use super::selection::{AthleteSelection, DaySelection};
use super::store::PlanStore;
use super::submit::{self, DayInput};
use super::week::IsoWeek;

/// State of one opened weekly plan.
///
/// The mode is fixed when the view is opened. Everything else changes
/// through the methods below; [`WeekPlanView::render`] produces what to draw.
#[derive(Debug)]
pub struct WeekPlanView {
    mode: ViewMode,
    week: IsoWeek,
    store: PlanStore,
    roster: Vec<RosterEntry>,
    days: DaySelection,
    athletes: AthleteSelection,
    drafts: Drafts,
}

impl WeekPlanView {
    /// Resolve the mode, load plan data and select the week containing `today`
    pub async fn open<B: PlanBackend>(
        backend: &B,
        params: ViewParams,
        today: NaiveDate,
    ) -> Result<Self, PlanError> {
        let decision = params.classify()?;

        let view = match decision {
            ModeDecision::Resolved(mode @ ViewMode::Coach { coach_id, .. }) => {
                let (plans, roster) = tokio::try_join!(
                    async {
                        backend
                            .coach_plans(coach_id)
                            .await
                            .map_err(PlanError::fetch("coach plans"))
                    },
                    async {
                        backend
                            .roster(coach_id)
                            .await
                            .map_err(PlanError::fetch("coach info"))
                    },
                )?;

                let mut view = Self::empty(mode, today);
                view.store.replace_all(plans);
                view.roster = roster;
                view
            }
            ModeDecision::Resolved(mode) => {
                let mut view = Self::empty(mode, today);
                view.reload(backend).await?;
                view
            }
            ModeDecision::NeedsRelationCheck(athlete_id) => {
                let plans = backend
                    .athlete_plans(athlete_id)
                    .await
                    .map_err(PlanError::fetch("athlete plans"))?;

                let has_coach = match backend.has_accepted_coach(athlete_id).await {
                    Ok(has_coach) => has_coach,
                    Err(e) => {
                        tracing::warn!("Relation check failed, treating athlete as solo: {}", e);
                        false
                    }
                };

                let mut view = Self::empty(decision.finish(has_coach), today);
                view.store.replace_all(plans);
                view
            }
        };

        tracing::info!(
            "Opened {} for week {} with {} stored plan(s)",
            view.mode.title(),
            view.week,
            view.store.len()
        );
        Ok(view)
    }

    fn empty(mode: ViewMode, today: NaiveDate) -> Self {
        Self {
            mode,
            week: IsoWeek::containing(today),
            store: PlanStore::new(),
            roster: Vec::new(),
            days: DaySelection::default(),
            athletes: AthleteSelection::default(),
            drafts: Drafts::default(),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn week(&self) -> IsoWeek {
        self.week
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn day_selection(&self) -> &DaySelection {
        &self.days
    }

    pub fn athlete_selection(&self) -> &AthleteSelection {
        &self.athletes
    }

    /// Athlete whose entries the grid shows
    pub fn focus_athlete(&self) -> Option<AthleteId> {
        if self.mode.is_coach() {
            self.athletes.focus(&self.roster, self.mode.athlete_id())
        } else {
            self.mode.athlete_id()
        }
    }

    pub fn render(&self) -> WeekView {
        render_week(&RenderContext {
            mode: self.mode,
            week: self.week,
            store: &self.store,
            drafts: &self.drafts,
            days: &self.days,
            athlete: self.focus_athlete(),
        })
    }

    /// Switch weeks; day selection and unsaved edits are dropped
    pub fn set_week(&mut self, week: IsoWeek) {
        self.week = week;
        self.days.clear();
        self.drafts.clear();
    }

    /// Flip a day in the coach's batch selection
    pub fn toggle_day(&mut self, date: NaiveDate) -> Result<bool, PlanError> {
        self.require_coach()?;
        self.require_in_week(date)?;
        Ok(self.days.toggle(date))
    }

    pub fn toggle_all_athletes(&mut self) -> Result<(), PlanError> {
        self.require_coach()?;
        self.athletes.toggle_all(&self.roster);
        self.drafts.clear();
        Ok(())
    }

    pub fn toggle_athlete(&mut self, id: AthleteId) -> Result<bool, PlanError> {
        self.require_coach()?;
        if !self.roster.iter().any(|a| a.athlete_id == id) {
            return Err(PlanError::UnknownAthlete(id));
        }
        let picked = self.athletes.toggle(id);
        self.drafts.clear();
        Ok(picked)
    }

    /// Type into a cell of the grid
    pub fn edit(&mut self, date: NaiveDate, field: PlanField, text: String) -> Result<(), PlanError> {
        if !self.mode.is_editable() {
            return Err(PlanError::ReadOnly);
        }
        self.require_in_week(date)?;
        self.drafts.set(date, field, text);
        Ok(())
    }

    /// Current text of a cell, draft or stored
    pub fn cell_text(&self, date: NaiveDate, field: PlanField) -> String {
        let stored = self.store.get(date, self.focus_athlete());
        self.drafts.text(date, field, stored)
    }

    pub fn has_unsaved_edits(&self) -> bool {
        !self.drafts.is_empty()
    }

    /// Refetch plan entries for this view from the server
    pub async fn reload<B: PlanBackend>(&mut self, backend: &B) -> Result<(), PlanError> {
        let plans = match self.mode {
            ViewMode::Coach { coach_id, .. } => backend
                .coach_plans(coach_id)
                .await
                .map_err(PlanError::fetch("coach plans"))?,
            ViewMode::AthleteManaged { athlete_id }
            | ViewMode::AthleteSolo { athlete_id }
            | ViewMode::Preview { athlete_id, .. } => backend
                .athlete_plans(athlete_id)
                .await
                .map_err(PlanError::fetch("athlete plans"))?,
        };

        self.store.replace_all(plans);
        Ok(())
    }

    /// Run the "send prediction" or "send actual" action of the current mode.
    ///
    /// Returns the success message to show.
    pub async fn send<B: PlanBackend>(
        &mut self,
        backend: &B,
        field: PlanField,
    ) -> Result<String, PlanError> {
        match (self.mode, field) {
            (ViewMode::Coach { coach_id, .. }, PlanField::Prediction) => {
                self.broadcast_predictions(backend, coach_id).await
            }
            (ViewMode::Coach { .. }, PlanField::Actual) => self.update_actuals(backend).await,
            (ViewMode::AthleteSolo { athlete_id }, field) => {
                self.save_solo(backend, athlete_id, field).await
            }
            (ViewMode::AthleteManaged { .. } | ViewMode::Preview { .. }, _) => {
                Err(PlanError::ReadOnly)
            }
        }
    }

    fn batch_targets(&self) -> Result<Vec<AthleteId>, PlanError> {
        let targets = self.athletes.targets(&self.roster, self.mode.athlete_id());
        if targets.is_empty() {
            return Err(PlanError::NoAthletesSelected);
        }
        if self.days.is_empty() {
            return Err(PlanError::NoDaysSelected);
        }
        Ok(targets)
    }

    fn selected_texts(&self, field: PlanField) -> HashMap<NaiveDate, String> {
        self.days
            .iter()
            .map(|date| (date, self.cell_text(date, field)))
            .collect()
    }

    async fn broadcast_predictions<B: PlanBackend>(
        &mut self,
        backend: &B,
        coach_id: i64,
    ) -> Result<String, PlanError> {
        let targets = self.batch_targets()?;
        let texts = self.selected_texts(PlanField::Prediction);
        let days: Vec<NaiveDate> = self.days.iter().collect();

        let sent = submit::send_predictions(backend, coach_id, &targets, days, |date| {
            texts.get(&date).cloned().unwrap_or_default()
        })
        .await;

        // Refresh even after a failure so earlier days of the batch show up
        let reloaded = self.reload(backend).await;
        let sent = sent?;
        reloaded?;

        self.drafts.clear();
        tracing::info!("Sent predictions for {} day(s) to {} athlete(s)", sent, targets.len());
        Ok("Predictions sent".to_string())
    }

    async fn update_actuals<B: PlanBackend>(&mut self, backend: &B) -> Result<String, PlanError> {
        let targets = self.batch_targets()?;
        let texts = self.selected_texts(PlanField::Actual);
        let days: Vec<NaiveDate> = self.days.iter().collect();

        let updated = submit::send_actuals(backend, &mut self.store, &targets, days, |date| {
            texts.get(&date).cloned().unwrap_or_default()
        })
        .await?;

        tracing::info!("Updated {} actual(s)", updated);
        Ok("Actuals updated".to_string())
    }

    async fn save_solo<B: PlanBackend>(
        &mut self,
        backend: &B,
        athlete_id: AthleteId,
        field: PlanField,
    ) -> Result<String, PlanError> {
        let inputs: Vec<DayInput> = self
            .week
            .dates()
            .iter()
            .map(|date| DayInput {
                date,
                prediction: self.cell_text(date, PlanField::Prediction),
                actual: self.cell_text(date, PlanField::Actual),
            })
            .collect();

        let written = submit::save_solo(backend, &mut self.store, athlete_id, field, inputs).await?;

        self.drafts.clear();
        tracing::info!("Saved {} solo plan(s)", written);
        Ok("Plans saved!".to_string())
    }

    fn require_coach(&self) -> Result<(), PlanError> {
        if self.mode.is_coach() {
            Ok(())
        } else {
            Err(PlanError::NotCoachMode)
        }
    }

    fn require_in_week(&self, date: NaiveDate) -> Result<(), PlanError> {
        if self.week.dates().contains(date) {
            Ok(())
        } else {
            Err(PlanError::DateOutsideWeek(date))
        }
    }
}
