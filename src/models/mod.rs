pub mod people;
pub mod plan;

pub use people::{CoachDecision, CoachProfile, PersonRecord, RelationStatus, RosterEntry, UserRecord};
pub use plan::{
    AthleteId, CoachId, PlanEntry, PlanField, PlanFilter, PlanId, PlanRequest, SendPlanRequest,
};
