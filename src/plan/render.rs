//! View model for the weekly plan grid.
//!
//! [`render_week`] joins the seven dates of the selected week with stored
//! entries and unsaved edits. Frontends only draw the resulting [`WeekView`].

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{AthleteId, PlanEntry, PlanField};

use super::mode::ViewMode;
use super::selection::DaySelection;
use super::store::PlanStore;
use super::week::IsoWeek;

pub const NO_PREDICTION: &str = "No prediction";
pub const NO_ACTUAL: &str = "No actual yet";

/// Unsaved text typed into the grid, per day
#[derive(Debug, Default, Clone)]
pub struct Drafts {
    days: HashMap<NaiveDate, DayDraft>,
}

#[derive(Debug, Default, Clone)]
struct DayDraft {
    prediction: Option<String>,
    actual: Option<String>,
}

impl Drafts {
    pub fn set(&mut self, date: NaiveDate, field: PlanField, text: String) {
        let day = self.days.entry(date).or_default();
        match field {
            PlanField::Prediction => day.prediction = Some(text),
            PlanField::Actual => day.actual = Some(text),
        }
    }

    /// What the input for `field` on `date` holds: the draft, else the stored text
    pub fn text(&self, date: NaiveDate, field: PlanField, stored: Option<&PlanEntry>) -> String {
        let draft = self.days.get(&date).and_then(|d| match field {
            PlanField::Prediction => d.prediction.as_ref(),
            PlanField::Actual => d.actual.as_ref(),
        });

        match (draft, stored) {
            (Some(text), _) => text.clone(),
            (None, Some(entry)) => match field {
                PlanField::Prediction => entry.prediction().to_string(),
                PlanField::Actual => entry.actual().to_string(),
            },
            (None, None) => String::new(),
        }
    }

    pub fn is_dirty(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Editable { text: String, dirty: bool },
    ReadOnly {
        text: Option<String>,
        placeholder: &'static str,
    },
}

impl CellView {
    fn read_only(text: &str, placeholder: &'static str) -> Self {
        CellView::ReadOnly {
            text: (!text.is_empty()).then(|| text.to_string()),
            placeholder,
        }
    }

    /// Text to draw, falling back to the placeholder
    pub fn display(&self) -> &str {
        match self {
            CellView::Editable { text, .. } => text,
            CellView::ReadOnly {
                text: Some(text), ..
            } => text,
            CellView::ReadOnly {
                text: None,
                placeholder,
            } => placeholder,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, CellView::Editable { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub prediction: CellView,
    pub actual: CellView,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    pub title: &'static str,
    pub week: IsoWeek,
    pub athlete: Option<AthleteId>,
    pub rows: Vec<RowView>,
    pub actions_visible: bool,
    pub roster_visible: bool,
    pub back_visible: bool,
}

/// Inputs of [`render_week`]
pub struct RenderContext<'a> {
    pub mode: ViewMode,
    pub week: IsoWeek,
    pub store: &'a PlanStore,
    pub drafts: &'a Drafts,
    pub days: &'a DaySelection,
    /// Athlete whose entries fill the grid
    pub athlete: Option<AthleteId>,
}

pub fn render_week(ctx: &RenderContext<'_>) -> WeekView {
    let editable = ctx.mode.is_editable();

    let rows = ctx
        .week
        .dates()
        .named()
        .map(|(date, weekday)| {
            let stored = ctx.store.get(date, ctx.athlete);
            let dirty = ctx.drafts.is_dirty(date);

            let (prediction, actual) = if editable {
                (
                    CellView::Editable {
                        text: ctx.drafts.text(date, PlanField::Prediction, stored),
                        dirty,
                    },
                    CellView::Editable {
                        text: ctx.drafts.text(date, PlanField::Actual, stored),
                        dirty,
                    },
                )
            } else {
                let prediction = stored.map(PlanEntry::prediction).unwrap_or("");
                let actual = stored.map(PlanEntry::actual).unwrap_or("");
                (
                    CellView::read_only(prediction, NO_PREDICTION),
                    CellView::read_only(actual, NO_ACTUAL),
                )
            };

            RowView {
                date,
                weekday,
                prediction,
                actual,
                selected: ctx.mode.is_coach() && ctx.days.contains(date),
            }
        })
        .collect();

    WeekView {
        title: ctx.mode.title(),
        week: ctx.week,
        athlete: ctx.athlete,
        rows,
        actions_visible: ctx.mode.shows_actions(),
        roster_visible: ctx.mode.is_coach(),
        back_visible: ctx.mode.shows_back(),
    }
}
