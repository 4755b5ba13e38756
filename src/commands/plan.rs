use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::access::Page;
use crate::models::{AthleteId, CoachId, PlanField, PlanFilter};
use crate::plan::{CellView, IsoWeek, Notice, ViewParams, WeekPlanView};
use crate::session::Session;

use super::Context;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    params: ViewParams,

    /// Week to open as YYYY-Www (default: current week)
    #[arg(short, long)]
    week: Option<IsoWeek>,
}

#[derive(Args)]
pub struct SendArgs {
    /// Field to send
    #[arg(value_enum)]
    field: PlanField,

    #[command(flatten)]
    params: ViewParams,

    /// Athlete to send to, repeatable (coach only)
    #[arg(long = "athlete")]
    athletes: Vec<AthleteId>,

    /// Send to every accepted athlete (coach only)
    #[arg(long)]
    all: bool,

    /// Text for one day as DATE=TEXT, repeatable; all days must be in one week
    #[arg(long = "entry", required = true, value_parser = parse_entry)]
    entries: Vec<(NaiveDate, String)>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    athlete_id: Option<AthleteId>,

    #[arg(long)]
    coach_id: Option<CoachId>,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

fn parse_entry(s: &str) -> Result<(NaiveDate, String), String> {
    let (date, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=TEXT, got '{}'", s))?;
    let date = date
        .trim()
        .parse::<NaiveDate>()
        .map_err(|e| format!("invalid date '{}': {}", date.trim(), e))?;
    Ok((date, text.to_string()))
}

/// Explicit ids win; otherwise the signed-in coach or athlete
fn view_params(params: ViewParams, session: &Session) -> ViewParams {
    if params.athlete_id.is_some() || params.coach_id.is_some() {
        return params;
    }

    ViewParams {
        athlete_id: session.athlete_id,
        coach_id: session.coach_id,
        readonly: params.readonly,
    }
}

async fn open_view(ctx: &Context, params: ViewParams, week: Option<IsoWeek>) -> Result<WeekPlanView> {
    let session = ctx.session()?;
    session.require(Page::Plan)?;

    let client = ctx.api()?;
    let params = view_params(params, session);
    let mut view = WeekPlanView::open(&client, params, Local::now().date_naive()).await?;

    if let Some(week) = week {
        view.set_week(week);
    }
    Ok(view)
}

pub async fn show(ctx: &Context, args: PlanArgs) -> Result<()> {
    let view = open_view(ctx, args.params, args.week).await?;
    print_week(&view);
    Ok(())
}

pub async fn edit(ctx: &Context, args: PlanArgs) -> Result<()> {
    let view = open_view(ctx, args.params, args.week).await?;
    crate::ui::run(ctx.api()?, view, &ctx.config.ui).await
}

pub async fn send(ctx: &Context, args: SendArgs) -> Result<()> {
    let first = args
        .entries
        .first()
        .map(|(date, _)| *date)
        .context("At least one --entry is required")?;
    let week = IsoWeek::containing(first);

    if let Some((date, _)) = args.entries.iter().find(|(d, _)| !week.dates().contains(*d)) {
        anyhow::bail!("{} is not in week {} of the first entry", date, week);
    }

    let mut view = open_view(ctx, args.params, Some(week)).await?;

    if view.mode().is_coach() {
        if args.all {
            view.toggle_all_athletes()?;
        }
        for &athlete in &args.athletes {
            view.toggle_athlete(athlete)?;
        }
        for &(date, _) in &args.entries {
            if !view.day_selection().contains(date) {
                view.toggle_day(date)?;
            }
        }
    } else if args.all || !args.athletes.is_empty() {
        anyhow::bail!("--athlete and --all are only available when managing plans as a coach");
    }

    for (date, text) in args.entries {
        view.edit(date, args.field, text)?;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Sending {} for week {}...", args.field, week));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let client = ctx.api()?;
    let result = view.send(&client, args.field).await;
    spinner.finish_and_clear();

    match result {
        Ok(message) => {
            println!("{}", Notice::info(message));
            println!();
            print_week(&view);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", Notice::error(e.to_string()));
            Err(e.into())
        }
    }
}

pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let session = ctx.session()?;
    session.require(Page::Plan)?;

    let mut filter = PlanFilter {
        athlete_id: args.athlete_id,
        coach_id: args.coach_id,
        from: args.from,
        to: args.to,
    };
    if filter.athlete_id.is_none() && filter.coach_id.is_none() {
        filter.athlete_id = session.athlete_id;
        filter.coach_id = session.coach_id;
    }

    let client = ctx.api()?;
    let mut plans = client
        .filter_plans(&filter)
        .await
        .context("Failed to load plans")?;
    plans.sort_by_key(|p| (p.plan_date, p.athlete_id));

    if plans.is_empty() {
        println!("No plans found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<20} {:<30} {:<30}",
        "Date".bold(),
        "Athlete".bold(),
        "Prediction".bold(),
        "Actual".bold()
    );
    for plan in &plans {
        let athlete = plan
            .athlete_name
            .clone()
            .unwrap_or_else(|| format!("#{}", plan.athlete_id));
        println!(
            "{:<12} {:<20} {:<30} {:<30}",
            plan.plan_date.to_string(),
            athlete,
            plan.prediction(),
            plan.actual()
        );
    }
    println!();
    println!("{} plan(s)", plans.len());

    Ok(())
}

fn cell(cell: &CellView) -> String {
    match cell {
        CellView::ReadOnly { text: None, .. } => cell.display().dimmed().to_string(),
        CellView::Editable { dirty: true, .. } => cell.display().yellow().to_string(),
        _ => cell.display().to_string(),
    }
}

fn print_week(view: &WeekPlanView) {
    let week = view.render();

    println!("{}", week.title.bold());
    println!(
        "Week {} ({} to {})",
        week.week,
        week.week.dates().first(),
        week.week.dates().last()
    );

    if let Some(athlete) = week.athlete {
        let name = view
            .roster()
            .iter()
            .find(|a| a.athlete_id == athlete)
            .map(|a| a.display_name())
            .unwrap_or_else(|| format!("#{}", athlete));
        println!("Athlete: {}", name);
    }

    if week.roster_visible {
        let selection = view.athlete_selection();
        let members: Vec<String> = view
            .roster()
            .iter()
            .map(|a| {
                let mark = if selection.is_picked(a.athlete_id) { "[x]" } else { "[ ]" };
                format!("{} {} ({})", mark, a.display_name(), a.athlete_id)
            })
            .collect();
        if members.is_empty() {
            println!("Roster: no accepted athletes");
        } else {
            println!("Roster: {}", members.join("  "));
        }
    }
    println!();

    for row in &week.rows {
        let mark = if row.selected { "*".green().to_string() } else { " ".to_string() };
        println!(
            "{} {:<10} {}  {:<30} {:<30}",
            mark,
            row.weekday,
            row.date,
            cell(&row.prediction),
            cell(&row.actual)
        );
    }
}
