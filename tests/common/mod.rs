#![allow(dead_code)]

use athlete_results_cli::api::ApiError;
use athlete_results_cli::models::{
    AthleteId, CoachId, PlanEntry, PlanId, PlanRequest, RosterEntry, SendPlanRequest,
};
use athlete_results_cli::plan::PlanBackend;
use chrono::NaiveDate;
use std::sync::Mutex;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Wednesday of 2024-W23 (Monday 2024-06-03 to Sunday 2024-06-09)
pub fn today() -> NaiveDate {
    date("2024-06-05")
}

pub fn entry(
    id: PlanId,
    athlete_id: AthleteId,
    coach_id: Option<CoachId>,
    day: &str,
    prediction: &str,
    actual: &str,
) -> PlanEntry {
    PlanEntry {
        id: Some(id),
        athlete_id,
        coach_id,
        plan_date: date(day),
        prediction_plan: Some(prediction.to_string()),
        actual_plan: Some(actual.to_string()),
        notes: None,
        athlete_name: None,
        coach_name: None,
    }
}

pub fn athlete(id: AthleteId, name: &str) -> RosterEntry {
    RosterEntry {
        athlete_id: id,
        name: Some(name.to_string()),
        lastname: None,
        relation_status: Some("ACCEPT".to_string()),
    }
}

/// Requests seen by [`FakeBackend`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CoachPlans(CoachId),
    AthletePlans(AthleteId),
    RelationCheck(AthleteId),
    Roster(CoachId),
    Send(CoachId, SendPlanRequest),
    Create(PlanRequest),
    Update(PlanId, PlanRequest),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Send(..) | Call::Create(_) | Call::Update(..))
    }
}

#[derive(Default)]
struct State {
    plans: Vec<PlanEntry>,
    roster: Vec<RosterEntry>,
    has_coach: bool,
    relation_check_fails: bool,
    fail_write: Option<usize>,
    writes: usize,
    next_id: PlanId,
    calls: Vec<Call>,
}

/// In-memory plan server
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
        }
    }

    pub fn with_plans(self, plans: Vec<PlanEntry>) -> Self {
        self.state.lock().unwrap().plans = plans;
        self
    }

    pub fn with_roster(self, roster: Vec<RosterEntry>) -> Self {
        self.state.lock().unwrap().roster = roster;
        self
    }

    pub fn with_coach(self) -> Self {
        self.state.lock().unwrap().has_coach = true;
        self
    }

    pub fn relation_check_fails(self) -> Self {
        self.state.lock().unwrap().relation_check_fails = true;
        self
    }

    /// Make the `n`th write request (1-based) fail with a server error
    pub fn fail_write(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_write = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn plans(&self) -> Vec<PlanEntry> {
        self.state.lock().unwrap().plans.clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let is_write = call.is_write();
        state.calls.push(call);

        if is_write {
            state.writes += 1;
            if state.fail_write == Some(state.writes) {
                return Err(ApiError::ServerError("Plan could not be saved".to_string()));
            }
        }
        Ok(())
    }
}

impl PlanBackend for FakeBackend {
    async fn coach_plans(&self, coach_id: CoachId) -> Result<Vec<PlanEntry>, ApiError> {
        self.record(Call::CoachPlans(coach_id))?;
        Ok(self
            .plans()
            .into_iter()
            .filter(|p| p.coach_id == Some(coach_id))
            .collect())
    }

    async fn athlete_plans(&self, athlete_id: AthleteId) -> Result<Vec<PlanEntry>, ApiError> {
        self.record(Call::AthletePlans(athlete_id))?;
        Ok(self
            .plans()
            .into_iter()
            .filter(|p| p.athlete_id == athlete_id)
            .collect())
    }

    async fn has_accepted_coach(&self, athlete_id: AthleteId) -> Result<bool, ApiError> {
        self.record(Call::RelationCheck(athlete_id))?;
        let state = self.state.lock().unwrap();
        if state.relation_check_fails {
            return Err(ApiError::NetworkError("connection refused".to_string()));
        }
        Ok(state.has_coach)
    }

    async fn roster(&self, coach_id: CoachId) -> Result<Vec<RosterEntry>, ApiError> {
        self.record(Call::Roster(coach_id))?;
        Ok(self.state.lock().unwrap().roster.clone())
    }

    async fn send_plan(&self, coach_id: CoachId, request: &SendPlanRequest) -> Result<(), ApiError> {
        self.record(Call::Send(coach_id, request.clone()))?;

        let mut state = self.state.lock().unwrap();
        for &athlete_id in &request.athlete_ids {
            let existing = state
                .plans
                .iter()
                .position(|p| p.athlete_id == athlete_id && p.plan_date == request.plan_date);

            match existing {
                Some(idx) => {
                    state.plans[idx].prediction_plan = Some(request.prediction_plan.clone());
                    state.plans[idx].coach_id = Some(coach_id);
                }
                None => {
                    state.next_id += 1;
                    let id = state.next_id;
                    state.plans.push(PlanEntry {
                        id: Some(id),
                        athlete_id,
                        coach_id: Some(coach_id),
                        plan_date: request.plan_date,
                        prediction_plan: Some(request.prediction_plan.clone()),
                        actual_plan: Some(request.actual_plan.clone()),
                        notes: None,
                        athlete_name: None,
                        coach_name: None,
                    });
                }
            }
        }
        Ok(())
    }

    async fn create_plan(&self, request: &PlanRequest) -> Result<PlanEntry, ApiError> {
        self.record(Call::Create(request.clone()))?;

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = PlanEntry {
            id: Some(state.next_id),
            athlete_id: request.athlete_id,
            coach_id: request.coach_id,
            plan_date: request.plan_date,
            prediction_plan: Some(request.prediction_plan.clone()),
            actual_plan: Some(request.actual_plan.clone()),
            notes: request.notes.clone(),
            athlete_name: None,
            coach_name: None,
        };
        state.plans.push(created.clone());
        Ok(created)
    }

    async fn update_plan(&self, id: PlanId, request: &PlanRequest) -> Result<PlanEntry, ApiError> {
        self.record(Call::Update(id, request.clone()))?;

        let mut state = self.state.lock().unwrap();
        let plan = state
            .plans
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| ApiError::NotFound(format!("Plan {} not found", id)))?;

        plan.prediction_plan = Some(request.prediction_plan.clone());
        plan.actual_plan = Some(request.actual_plan.clone());
        plan.notes = request.notes.clone();
        Ok(plan.clone())
    }
}
