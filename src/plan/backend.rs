use std::future::Future;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    AthleteId, CoachId, PlanEntry, PlanId, PlanRequest, RelationStatus, RosterEntry,
    SendPlanRequest,
};

/// Remote operations the weekly plan view depends on
pub trait PlanBackend {
    fn coach_plans(
        &self,
        coach_id: CoachId,
    ) -> impl Future<Output = Result<Vec<PlanEntry>, ApiError>> + Send;

    fn athlete_plans(
        &self,
        athlete_id: AthleteId,
    ) -> impl Future<Output = Result<Vec<PlanEntry>, ApiError>> + Send;

    /// Whether the athlete has at least one accepted coach relation
    fn has_accepted_coach(
        &self,
        athlete_id: AthleteId,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    /// Accepted athletes of the coach, sorted by name
    fn roster(
        &self,
        coach_id: CoachId,
    ) -> impl Future<Output = Result<Vec<RosterEntry>, ApiError>> + Send;

    fn send_plan(
        &self,
        coach_id: CoachId,
        request: &SendPlanRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn create_plan(
        &self,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<PlanEntry, ApiError>> + Send;

    fn update_plan(
        &self,
        id: PlanId,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<PlanEntry, ApiError>> + Send;
}

impl PlanBackend for ApiClient {
    async fn coach_plans(&self, coach_id: CoachId) -> Result<Vec<PlanEntry>, ApiError> {
        ApiClient::coach_plans(self, coach_id).await
    }

    async fn athlete_plans(&self, athlete_id: AthleteId) -> Result<Vec<PlanEntry>, ApiError> {
        ApiClient::athlete_plans(self, athlete_id).await
    }

    async fn has_accepted_coach(&self, athlete_id: AthleteId) -> Result<bool, ApiError> {
        let coaches = self
            .coaches_by_decision(athlete_id, RelationStatus::Accept)
            .await?;
        Ok(!coaches.is_empty())
    }

    async fn roster(&self, coach_id: CoachId) -> Result<Vec<RosterEntry>, ApiError> {
        Ok(self.coach_profile(coach_id).await?.accepted_roster())
    }

    async fn send_plan(&self, coach_id: CoachId, request: &SendPlanRequest) -> Result<(), ApiError> {
        ApiClient::send_plan(self, coach_id, request).await
    }

    async fn create_plan(&self, request: &PlanRequest) -> Result<PlanEntry, ApiError> {
        ApiClient::create_plan(self, request).await
    }

    async fn update_plan(&self, id: PlanId, request: &PlanRequest) -> Result<PlanEntry, ApiError> {
        ApiClient::update_plan(self, id, request).await
    }
}
