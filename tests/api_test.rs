use anyhow::Result;
use athlete_results_cli::api::{ApiClient, ApiError};
use athlete_results_cli::config::Config;
use athlete_results_cli::models::{PlanFilter, PlanRequest, RelationStatus, SendPlanRequest};
use athlete_results_cli::plan::PlanBackend;
use chrono::NaiveDate;
use mockito::{Matcher, Server};
use serde_json::json;

fn signed_in(server: &Server) -> ApiClient {
    let mut config = Config::default();
    config.api.base_url = server.url();
    config.session.token = "jwt-123".to_string();
    ApiClient::new(&config).unwrap()
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

#[tokio::test]
async fn test_coach_plans_sends_bearer_token() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/plans/coach/7")
        .match_header("authorization", "Bearer jwt-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": 12,
                "planDate": "2024-06-03",
                "predictionPlan": "Tempo run",
                "actualPlan": null,
                "notes": null,
                "athleteName": "Ana",
                "coachName": "Carla",
                "athleteId": 101,
                "coachId": 7
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let plans = signed_in(&server).coach_plans(7).await?;

    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].athlete_id, 101);
    assert_eq!(plans[0].plan_date, june(3));
    assert_eq!(plans[0].athlete_name.as_deref(), Some("Ana"));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_send_plan_body() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/plans/coach/7/send")
        .match_body(Matcher::Json(json!({
            "athleteIds": [101, 102],
            "planDate": "2024-06-04",
            "predictionPlan": "Hill repeats",
            "actualPlan": "",
            "notes": null
        })))
        .with_status(200)
        .with_body("Plans sent")
        .create_async()
        .await;

    let request = SendPlanRequest::prediction(vec![101, 102], june(4), "Hill repeats".to_string());
    signed_in(&server).send_plan(7, &request).await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_update_plan_returns_saved_entry() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/plans/12")
        .match_body(Matcher::PartialJson(json!({
            "athleteId": 101,
            "coachId": 7,
            "actualPlan": "Ran 8km"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 12,
                "planDate": "2024-06-03",
                "predictionPlan": "Tempo run",
                "actualPlan": "Ran 8km",
                "athleteId": 101,
                "coachId": 7
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = PlanRequest {
        athlete_id: 101,
        coach_id: Some(7),
        plan_date: june(3),
        prediction_plan: "Tempo run".to_string(),
        actual_plan: "Ran 8km".to_string(),
        notes: None,
    };
    let saved = signed_in(&server).update_plan(12, &request).await?;

    assert_eq!(saved.id, Some(12));
    assert_eq!(saved.actual(), "Ran 8km");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_server_error_text_is_kept() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/plans")
        .with_status(400)
        .with_body("A plan already exists for this athlete on this date")
        .create_async()
        .await;

    let request = PlanRequest::solo(5, june(3), "5km".to_string(), String::new());
    let result = signed_in(&server).create_plan(&request).await;

    match result {
        Err(ApiError::BadRequest(message)) => {
            assert_eq!(message, "A plan already exists for this athlete on this date")
        }
        other => panic!("expected bad request, got {:?}", other),
    }
}

#[tokio::test]
async fn test_filter_plans_query() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/plans/filter")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("athleteId".to_string(), "5".to_string()),
            Matcher::UrlEncoded("from".to_string(), "2024-06-03".to_string()),
            Matcher::UrlEncoded("to".to_string(), "2024-06-09".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let filter = PlanFilter {
        athlete_id: Some(5),
        coach_id: None,
        from: Some(june(3)),
        to: Some(june(9)),
    };
    let plans = signed_in(&server).filter_plans(&filter).await?;

    assert!(plans.is_empty());
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_roster_keeps_accepted_athletes_by_name() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/coaches/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 7,
                "name": "Carla",
                "athletesWithStatus": [
                    { "athlete_id": 103, "name": "Zoe", "relation_status": "ACCEPT" },
                    { "athlete_id": 104, "name": "Max", "relation_status": "PENDING" },
                    { "athlete_id": 101, "name": "Ana", "relation_status": "accept" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let roster = signed_in(&server).roster(7).await?;
    let ids: Vec<i64> = roster.iter().map(|a| a.athlete_id).collect();

    assert_eq!(ids, vec![101, 103]);
    Ok(())
}

#[tokio::test]
async fn test_relation_check_uses_accepted_coaches() -> Result<()> {
    let mut server = Server::new_async().await;
    let _none = server
        .mock("GET", "/athletes/5/coaches/decision/accept")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let _some = server
        .mock("GET", "/athletes/6/coaches/decision/accept")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "coach_id": 7, "name": "Carla", "status": "ACCEPT" }]).to_string())
        .create_async()
        .await;

    let client = signed_in(&server);
    assert!(!client.has_accepted_coach(5).await?);
    assert!(client.has_accepted_coach(6).await?);
    Ok(())
}

#[tokio::test]
async fn test_decide_request_query() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/relations/refuse")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("athleteId".to_string(), "5".to_string()),
            Matcher::UrlEncoded("coachId".to_string(), "7".to_string()),
        ]))
        .with_status(200)
        .with_body("Request refused")
        .create_async()
        .await;

    let message = signed_in(&server)
        .decide_request(5, 7, RelationStatus::Refuse)
        .await?;

    assert_eq!(message, "Request refused");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_resend_request_path() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/coaches/7/athletes/101/status/pending")
        .with_status(200)
        .create_async()
        .await;

    signed_in(&server).resend_request(7, 101).await?;

    mock.assert_async().await;
    Ok(())
}
