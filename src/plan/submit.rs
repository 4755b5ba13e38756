//! Batch writes issued from one user action.
//!
//! Requests are sent one at a time and the first failure aborts the rest of
//! the batch. Writes that already succeeded are kept.

use chrono::NaiveDate;

use crate::models::{AthleteId, CoachId, PlanField, PlanRequest, SendPlanRequest};

use super::backend::PlanBackend;
use super::error::PlanError;
use super::store::PlanStore;

/// Broadcast each day's prediction to `athletes`, one request per day
pub async fn send_predictions<B, F>(
    backend: &B,
    coach_id: CoachId,
    athletes: &[AthleteId],
    days: impl IntoIterator<Item = NaiveDate>,
    prediction_for: F,
) -> Result<usize, PlanError>
where
    B: PlanBackend,
    F: Fn(NaiveDate) -> String,
{
    let mut sent = 0;

    for date in days {
        let request = SendPlanRequest::prediction(athletes.to_vec(), date, prediction_for(date));
        backend
            .send_plan(coach_id, &request)
            .await
            .map_err(PlanError::write("send prediction", date))?;

        tracing::debug!("Sent prediction for {} to {} athlete(s)", date, athletes.len());
        sent += 1;
    }

    Ok(sent)
}

/// Attach each day's actual to the existing entries of `athletes`.
///
/// Entries that were never created are skipped; the prediction of each
/// updated entry is left as stored.
pub async fn send_actuals<B, F>(
    backend: &B,
    store: &mut PlanStore,
    athletes: &[AthleteId],
    days: impl IntoIterator<Item = NaiveDate>,
    actual_for: F,
) -> Result<usize, PlanError>
where
    B: PlanBackend,
    F: Fn(NaiveDate) -> String,
{
    let mut updated = 0;

    for date in days {
        let actual = actual_for(date);

        for &athlete in athletes {
            let Some(existing) = store.get(date, Some(athlete)) else {
                tracing::debug!("No plan for athlete {} on {}, skipping actual", athlete, date);
                continue;
            };
            let Some(id) = existing.id else {
                tracing::debug!("Plan for athlete {} on {} has no id, skipping", athlete, date);
                continue;
            };

            let request = existing.to_request(existing.prediction().to_string(), actual.clone());
            let saved = backend
                .update_plan(id, &request)
                .await
                .map_err(PlanError::write("update actual", date))?;

            store.upsert(saved);
            updated += 1;
        }
    }

    Ok(updated)
}

/// One day's inputs on the solo athlete grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayInput {
    pub date: NaiveDate,
    pub prediction: String,
    pub actual: String,
}

/// Save a solo athlete's week.
///
/// Days with both inputs blank are skipped. A day without an entry is created
/// with both texts. An existing entry gets the `field` being saved from the
/// input and keeps the other field as stored.
pub async fn save_solo<B: PlanBackend>(
    backend: &B,
    store: &mut PlanStore,
    athlete_id: AthleteId,
    field: PlanField,
    inputs: impl IntoIterator<Item = DayInput>,
) -> Result<usize, PlanError> {
    let mut written = 0;

    for input in inputs {
        let prediction = input.prediction.trim().to_string();
        let actual = input.actual.trim().to_string();

        if prediction.is_empty() && actual.is_empty() {
            continue;
        }

        let existing = store
            .get(input.date, Some(athlete_id))
            .and_then(|entry| entry.id.map(|id| (id, entry)));

        let saved = match existing {
            Some((id, existing)) => {
                let request = match field {
                    PlanField::Prediction => {
                        existing.to_request(prediction, existing.actual().to_string())
                    }
                    PlanField::Actual => {
                        existing.to_request(existing.prediction().to_string(), actual)
                    }
                };
                backend
                    .update_plan(id, &request)
                    .await
                    .map_err(PlanError::write("update plan", input.date))?
            }
            None => {
                let request = PlanRequest::solo(athlete_id, input.date, prediction, actual);
                backend
                    .create_plan(&request)
                    .await
                    .map_err(PlanError::write("create plan", input.date))?
            }
        };

        store.upsert(saved);
        written += 1;
    }

    Ok(written)
}
