use serde::{Deserialize, Serialize};

use super::plan::{AthleteId, CoachId};

/// An athlete as listed on a coach profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(alias = "id")]
    pub athlete_id: AthleteId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub relation_status: Option<String>,
}

impl RosterEntry {
    pub fn display_name(&self) -> String {
        match (self.name.as_deref(), self.lastname.as_deref()) {
            (Some(name), Some(last)) if !last.is_empty() => format!("{} {}", name, last),
            (Some(name), _) => name.to_string(),
            (None, _) => format!("Athlete #{}", self.athlete_id),
        }
    }

    fn is_accepted(&self) -> bool {
        self.relation_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(RelationStatus::Accept.as_str()))
    }
}

/// `GET /coaches/{id}` response, reduced to what the client reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachProfile {
    pub id: CoachId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub athletes_with_status: Vec<RosterEntry>,
}

impl CoachProfile {
    /// Athletes with an accepted relation, sorted by name
    pub fn accepted_roster(self) -> Vec<RosterEntry> {
        let mut roster: Vec<RosterEntry> = self
            .athletes_with_status
            .into_iter()
            .filter(RosterEntry::is_accepted)
            .collect();
        roster.sort_by(|a, b| {
            a.name
                .as_deref()
                .unwrap_or("")
                .cmp(b.name.as_deref().unwrap_or(""))
        });
        roster
    }
}

/// A coach relation as seen from the athlete side
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachDecision {
    #[serde(rename = "coach_id")]
    pub coach_id: CoachId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Decision state of a coach-athlete link request
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RelationStatus {
    Pending,
    Accept,
    Refuse,
}

impl RelationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationStatus::Pending => "pending",
            RelationStatus::Accept => "accept",
            RelationStatus::Refuse => "refuse",
        }
    }
}

/// `GET /users/by-username/{username}` response
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRecord {
    #[serde(default)]
    pub name: Option<String>,
}

/// Coach or athlete record looked up by user id; only the id is used
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepted_roster_filters_and_sorts() {
        let profile: CoachProfile = serde_json::from_value(json!({
            "id": 7,
            "name": "Coach",
            "athletesWithStatus": [
                { "athlete_id": 102, "name": "Zoe", "relation_status": "accept" },
                { "athlete_id": 103, "name": "Mia", "relation_status": "pending" },
                { "athlete_id": 101, "name": "Ana", "relation_status": "ACCEPT" },
                { "athlete_id": 104, "name": "Bob", "relation_status": null }
            ]
        }))
        .unwrap();

        let roster = profile.accepted_roster();
        let ids: Vec<AthleteId> = roster.iter().map(|a| a.athlete_id).collect();
        assert_eq!(ids, vec![101, 102]);
    }

    #[test]
    fn test_roster_entry_accepts_id_alias() {
        let entry: RosterEntry = serde_json::from_value(json!({ "id": 9, "name": "Lea" })).unwrap();
        assert_eq!(entry.athlete_id, 9);
        assert_eq!(entry.display_name(), "Lea");
    }
}
