use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type AthleteId = i64;
pub type CoachId = i64;
pub type PlanId = i64;

/// One day's training plan for one athlete, as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    #[serde(default)]
    pub id: Option<PlanId>,
    pub athlete_id: AthleteId,
    #[serde(default)]
    pub coach_id: Option<CoachId>,
    pub plan_date: NaiveDate,
    #[serde(default)]
    pub prediction_plan: Option<String>,
    #[serde(default)]
    pub actual_plan: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_name: Option<String>,
}

impl PlanEntry {
    /// Planned work, empty when the server sent null
    pub fn prediction(&self) -> &str {
        self.prediction_plan.as_deref().unwrap_or("")
    }

    /// Logged work, empty when the server sent null
    pub fn actual(&self) -> &str {
        self.actual_plan.as_deref().unwrap_or("")
    }

    /// Full update payload for this entry with the given texts
    pub fn to_request(&self, prediction: String, actual: String) -> PlanRequest {
        PlanRequest {
            athlete_id: self.athlete_id,
            coach_id: self.coach_id,
            plan_date: self.plan_date,
            prediction_plan: prediction,
            actual_plan: actual,
            notes: self.notes.clone(),
        }
    }
}

/// Body of `POST /plans` and `PUT /plans/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub athlete_id: AthleteId,
    pub coach_id: Option<CoachId>,
    pub plan_date: NaiveDate,
    pub prediction_plan: String,
    pub actual_plan: String,
    pub notes: Option<String>,
}

impl PlanRequest {
    /// New self-managed entry (no coach)
    pub fn solo(
        athlete_id: AthleteId,
        plan_date: NaiveDate,
        prediction: String,
        actual: String,
    ) -> Self {
        Self {
            athlete_id,
            coach_id: None,
            plan_date,
            prediction_plan: prediction,
            actual_plan: actual,
            notes: None,
        }
    }
}

/// Body of `POST /plans/coach/{coachId}/send`; the server creates one entry per athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPlanRequest {
    pub athlete_ids: Vec<AthleteId>,
    pub plan_date: NaiveDate,
    pub prediction_plan: String,
    pub actual_plan: String,
    pub notes: Option<String>,
}

impl SendPlanRequest {
    pub fn prediction(athlete_ids: Vec<AthleteId>, plan_date: NaiveDate, text: String) -> Self {
        Self {
            athlete_ids,
            plan_date,
            prediction_plan: text,
            actual_plan: String::new(),
            notes: None,
        }
    }
}

/// Query for `GET /plans/filter`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete_id: Option<AthleteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<CoachId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Which text field of a plan entry an action writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlanField {
    Prediction,
    Actual,
}

impl std::fmt::Display for PlanField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanField::Prediction => write!(f, "prediction"),
            PlanField::Actual => write!(f, "actual"),
        }
    }
}
