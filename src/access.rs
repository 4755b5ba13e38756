//! Role-based page gating.
//!
//! Each role has a fixed list of pages it may open. A user holding several
//! roles may open the union of their lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    DataAnalyst,
    Coach,
    Athlete,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Ok(Role::Admin),
            "DATA ANALYST" | "DATA_ANALYST" => Ok(Role::DataAnalyst),
            "COACH" => Ok(Role::Coach),
            "ATHLETE" => Ok(Role::Athlete),
            other => Err(anyhow::anyhow!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::DataAnalyst => write!(f, "DATA ANALYST"),
            Role::Coach => write!(f, "COACH"),
            Role::Athlete => write!(f, "ATHLETE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AllUsers,
    PersonalAthlete,
    PersonalCoach,
    Runner,
    Jumper,
    Throw,
    Gym,
    Marathon,
    AthleteManagement,
    Plan,
    CoachInfo,
    Requests,
    AthleteInfo,
}

const ADMIN_PAGES: &[Page] = &[
    Page::AllUsers,
    Page::PersonalAthlete,
    Page::PersonalCoach,
    Page::Runner,
    Page::Jumper,
    Page::Throw,
    Page::Gym,
    Page::Marathon,
    Page::AthleteManagement,
];

const COACH_PAGES: &[Page] = &[
    Page::PersonalCoach,
    Page::AthleteManagement,
    Page::Runner,
    Page::Jumper,
    Page::Throw,
    Page::Gym,
    Page::Marathon,
    Page::Plan,
    Page::CoachInfo,
];

const ATHLETE_PAGES: &[Page] = &[
    Page::PersonalAthlete,
    Page::Runner,
    Page::Jumper,
    Page::Throw,
    Page::Gym,
    Page::Marathon,
    Page::Plan,
    Page::Requests,
    Page::AthleteInfo,
];

impl Role {
    pub fn pages(&self) -> &'static [Page] {
        match self {
            Role::Admin => ADMIN_PAGES,
            Role::Coach => COACH_PAGES,
            Role::Athlete => ATHLETE_PAGES,
            Role::DataAnalyst => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
    /// No roles known, the user has to sign in first
    NoSession,
}

pub fn check(roles: &[Role], page: Page) -> Access {
    if roles.is_empty() {
        return Access::NoSession;
    }

    if roles.iter().any(|role| role.pages().contains(&page)) {
        Access::Allowed
    } else {
        Access::Denied
    }
}
