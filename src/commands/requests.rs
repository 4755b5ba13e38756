use anyhow::{Context as _, Result};
use chrono::Local;
use colored::Colorize;

use crate::access::Page;
use crate::models::{AthleteId, CoachId, RelationStatus};
use crate::storage::{Storage, DAILY_RESEND_LIMIT};

use super::Context;

pub async fn list(ctx: &Context, status: RelationStatus) -> Result<()> {
    let session = ctx.session()?;
    session.require(Page::Requests)?;
    let athlete_id = session
        .athlete_id
        .context("Coach requests are listed for athlete accounts only")?;

    let client = ctx.api()?;
    let coaches = client
        .coaches_by_decision(athlete_id, status)
        .await
        .context("Failed to load coach requests")?;

    println!("Coaches ({})", status.as_str());
    println!("────────────────────────────────");

    if coaches.is_empty() {
        println!("None.");
        return Ok(());
    }

    for coach in &coaches {
        let name = [coach.name.as_deref(), coach.lastname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {:>5}  {:<25} {}",
            coach.coach_id,
            name,
            coach.specialization.as_deref().unwrap_or("").dimmed()
        );
    }

    Ok(())
}

pub async fn decide(ctx: &Context, coach_id: CoachId, decision: RelationStatus) -> Result<()> {
    let session = ctx.session()?;
    session.require(Page::Requests)?;
    let athlete_id = session
        .athlete_id
        .context("Only athletes can answer coach requests")?;

    let client = ctx.api()?;
    let message = client
        .decide_request(athlete_id, coach_id, decision)
        .await
        .with_context(|| format!("Failed to {} coach {}", decision.as_str(), coach_id))?;

    tracing::info!("Athlete {} chose {} for coach {}", athlete_id, decision.as_str(), coach_id);
    if message.is_empty() {
        let done = match decision {
            RelationStatus::Accept => "accepted",
            RelationStatus::Refuse => "refused",
            RelationStatus::Pending => "left pending",
        };
        println!("✓ Request {}", done);
    } else {
        println!("✓ {}", message);
    }

    Ok(())
}

pub async fn resend(ctx: &Context, athlete_id: AthleteId) -> Result<()> {
    let session = ctx.session()?;
    session.require(Page::AthleteManagement)?;
    let coach_id = session
        .coach_id
        .context("Only coaches can resend link requests")?;

    let today = Local::now().date_naive();
    let storage = Storage::init()?;

    if storage.remaining_resends(coach_id, athlete_id, today)? == 0 {
        anyhow::bail!(
            "You can only resend {} requests per day to the same athlete",
            DAILY_RESEND_LIMIT
        );
    }

    let client = ctx.api()?;
    client
        .resend_request(coach_id, athlete_id)
        .await
        .context("Failed to resend request")?;

    let remaining = storage.record_resend(coach_id, athlete_id, today)?;
    println!("✓ Request sent again to athlete {}", athlete_id);
    println!("  {} resend(s) left today", remaining);

    Ok(())
}
