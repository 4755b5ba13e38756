use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::models::{
    AthleteId, CoachDecision, CoachId, CoachProfile, PersonRecord, PlanEntry, PlanFilter, PlanId,
    PlanRequest, RelationStatus, SendPlanRequest, UserRecord,
};

mod error;

pub use error::ApiError;

/// Login request payload
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// API client for the athlete results backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API, carrying the stored session token if any
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let token = config.session.validate().ok().map(|s| s.token.clone());

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Same client, authenticated with `token`
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotLoggedIn)?;
        let url = format!("{}{}", self.base_url, path);

        Ok(self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", token)))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            tracing::debug!("Request failed with {}: {}", status, error_text);
            Err(ApiError::from_status(status, error_text))
        }
    }

    /// Authenticated GET, decoding a JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!("GET {}", path);
        let response = self.send(self.request(Method::GET, path)?).await?;
        Ok(response.json().await?)
    }

    /// Authenticated POST with a JSON body, decoding a JSON response
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!("POST {}", path);
        let response = self.send(self.request(Method::POST, path)?.json(body)).await?;
        Ok(response.json().await?)
    }

    /// Authenticated PUT with a JSON body, decoding a JSON response
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!("PUT {}", path);
        let response = self.send(self.request(Method::PUT, path)?.json(body)).await?;
        Ok(response.json().await?)
    }

    /// Sign in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}/auth/login", self.base_url);

        tracing::debug!("Logging in as {}", username);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let token = body.trim().trim_matches('"').to_string();
            if token.is_empty() {
                return Err(ApiError::Decode("Empty token in login response".to_string()));
            }
            Ok(token)
        } else if status == StatusCode::UNAUTHORIZED {
            let message = body.trim();
            Err(ApiError::AuthenticationFailed(if message.is_empty() {
                "Invalid credentials".to_string()
            } else {
                message.to_string()
            }))
        } else {
            Err(ApiError::from_status(status, body))
        }
    }

    pub async fn user_by_username(&self, username: &str) -> Result<UserRecord, ApiError> {
        self.get(&format!("/users/by-username/{}", username)).await
    }

    pub async fn coach_by_user(&self, user_id: i64) -> Result<PersonRecord, ApiError> {
        self.get(&format!("/coaches/by-user/{}", user_id)).await
    }

    pub async fn athlete_by_user(&self, user_id: i64) -> Result<PersonRecord, ApiError> {
        self.get(&format!("/athletes/by-user/{}", user_id)).await
    }

    pub async fn coach_plans(&self, coach_id: CoachId) -> Result<Vec<PlanEntry>, ApiError> {
        self.get(&format!("/plans/coach/{}", coach_id)).await
    }

    pub async fn athlete_plans(&self, athlete_id: AthleteId) -> Result<Vec<PlanEntry>, ApiError> {
        self.get(&format!("/plans/athlete/{}", athlete_id)).await
    }

    pub async fn filter_plans(&self, filter: &PlanFilter) -> Result<Vec<PlanEntry>, ApiError> {
        tracing::debug!("GET /plans/filter {:?}", filter);
        let request = self.request(Method::GET, "/plans/filter")?.query(filter);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    pub async fn coach_profile(&self, coach_id: CoachId) -> Result<CoachProfile, ApiError> {
        self.get(&format!("/coaches/{}", coach_id)).await
    }

    pub async fn coaches_by_decision(
        &self,
        athlete_id: AthleteId,
        status: RelationStatus,
    ) -> Result<Vec<CoachDecision>, ApiError> {
        self.get(&format!(
            "/athletes/{}/coaches/decision/{}",
            athlete_id,
            status.as_str()
        ))
        .await
    }

    /// Fan a prediction out to several athletes for one date
    pub async fn send_plan(
        &self,
        coach_id: CoachId,
        request: &SendPlanRequest,
    ) -> Result<(), ApiError> {
        let path = format!("/plans/coach/{}/send", coach_id);
        tracing::debug!("POST {}", path);
        self.send(self.request(Method::POST, &path)?.json(request))
            .await?;
        Ok(())
    }

    pub async fn create_plan(&self, request: &PlanRequest) -> Result<PlanEntry, ApiError> {
        self.post("/plans", request).await
    }

    pub async fn update_plan(
        &self,
        id: PlanId,
        request: &PlanRequest,
    ) -> Result<PlanEntry, ApiError> {
        self.put(&format!("/plans/{}", id), request).await
    }

    /// Accept or refuse a pending coach request; returns the server's message
    pub async fn decide_request(
        &self,
        athlete_id: AthleteId,
        coach_id: CoachId,
        decision: RelationStatus,
    ) -> Result<String, ApiError> {
        let path = format!("/relations/{}", decision.as_str());
        let request = self
            .request(Method::POST, &path)?
            .query(&[("athleteId", athlete_id), ("coachId", coach_id)]);
        let response = self.send(request).await?;
        Ok(response.text().await?.trim().to_string())
    }

    /// Put an existing relation back to pending so the athlete is asked again
    pub async fn resend_request(
        &self,
        coach_id: CoachId,
        athlete_id: AthleteId,
    ) -> Result<(), ApiError> {
        let path = format!("/coaches/{}/athletes/{}/status/pending", coach_id, athlete_id);
        tracing::debug!("PUT {}", path);
        self.send(self.request(Method::PUT, &path)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let config = Config::default();
        let client = ApiClient::new(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8080/api/".to_string();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[tokio::test]
    async fn test_requests_require_session() {
        let client = ApiClient::new(&Config::default()).unwrap();
        let result = client.coach_plans(7).await;
        assert!(matches!(result, Err(ApiError::NotLoggedIn)));
    }
}
