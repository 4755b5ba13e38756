//! Signed-in session state.
//!
//! A `Session` is established by [`sign_in`], stored in the config file, checked with
//! [`Session::validate`] before any data operation and wiped by [`Session::clear`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::access::{self, Access, Page, Role};
use crate::api::{ApiClient, ApiError};
use crate::models::{AthleteId, CoachId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub athlete_id: Option<AthleteId>,

    #[serde(default)]
    pub coach_id: Option<CoachId>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        !self.token.is_empty()
    }

    /// The session, if it carries a credential
    pub fn validate(&self) -> Result<&Session, ApiError> {
        if self.is_active() {
            Ok(self)
        } else {
            Err(ApiError::NotLoggedIn)
        }
    }

    pub fn clear(&mut self) {
        *self = Session::default();
    }

    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }

    /// Access to `page`, failing with a readable message when denied
    pub fn require(&self, page: Page) -> Result<()> {
        match access::check(&self.roles, page) {
            Access::Allowed => Ok(()),
            Access::NoSession => Err(anyhow::anyhow!(
                "No roles found for this session, please log in again"
            )),
            Access::Denied => Err(anyhow::anyhow!("Access denied for role(s) {}", self.role_list())),
        }
    }

    pub fn role_list(&self) -> String {
        self.roles
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sign in and resolve the coach or athlete identity behind the user
pub async fn sign_in(api: &ApiClient, username: &str, password: &str) -> Result<Session> {
    let token = api.login(username, password).await?;
    let api = api.with_token(token.clone());

    let user = api
        .user_by_username(username)
        .await
        .context("User not found")?;

    let roles: Vec<Role> = user
        .roles
        .iter()
        .filter_map(|r| r.name.as_deref())
        .filter_map(|name| match name.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!("Ignoring role: {}", e);
                None
            }
        })
        .collect();

    let mut session = Session {
        token,
        username: username.to_string(),
        user_id: Some(user.id),
        roles,
        athlete_id: None,
        coach_id: None,
    };

    if session.roles.iter().any(|r| matches!(r, Role::Admin | Role::DataAnalyst)) {
        tracing::info!("Signed in {} without coach or athlete identity", username);
    } else if session.roles.contains(&Role::Coach) {
        let coach = api
            .coach_by_user(user.id)
            .await
            .context("Coach record not found")?;
        session.coach_id = Some(coach.id);
    } else if session.roles.contains(&Role::Athlete) {
        let athlete = api
            .athlete_by_user(user.id)
            .await
            .context("Athlete record not found")?;
        session.athlete_id = Some(athlete.id);
    } else {
        return Err(anyhow::anyhow!("Unknown role, cannot open a workspace"));
    }

    tracing::info!("Successfully logged in as {}", username);
    Ok(session)
}
