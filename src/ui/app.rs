use anyhow::Result;
use crossterm::event::KeyCode;
use std::time::{Duration, Instant};

use crate::models::{PlanField, RosterEntry};
use crate::plan::{Notice, PlanError, WeekPlanView};

/// What the event loop has to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Send(PlanField),
    Reload,
}

/// Application state for the weekly plan terminal view
pub struct PlanApp {
    pub view: WeekPlanView,
    /// Should the application quit?
    pub should_quit: bool,
    /// Row of the selected day, 0 = Monday
    pub cursor: usize,
    pub column: PlanField,
    /// Text being typed into the selected cell
    pub editing: Option<String>,
    /// Show help overlay
    pub show_help: bool,
    /// Case-insensitive name filter over the roster
    pub roster_filter: String,
    /// Typing into the roster filter
    pub filtering: bool,
    notice: Option<(Notice, Instant)>,
    notice_ttl: Duration,
}

impl PlanApp {
    pub fn new(view: WeekPlanView, notice_ttl: Duration) -> Self {
        Self {
            view,
            should_quit: false,
            cursor: 0,
            column: PlanField::Prediction,
            editing: None,
            show_help: false,
            roster_filter: String::new(),
            filtering: false,
            notice: None,
            notice_ttl,
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// Notice to show, if it has not expired yet
    pub fn notice(&self) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|(_, shown)| shown.elapsed() < self.notice_ttl)
            .map(|(notice, _)| notice)
    }

    /// Drop an expired notice
    pub fn tick(&mut self) {
        if self.notice.is_some() && self.notice().is_none() {
            self.notice = None;
        }
    }

    fn report(&mut self, result: Result<(), PlanError>) {
        if let Err(e) = result {
            self.set_notice(Notice::error(e.to_string()));
        }
    }

    /// Turn the outcome of a send into a notice; fatal errors end the view
    pub fn finish_send(&mut self, result: Result<String, PlanError>) -> Result<()> {
        match result {
            Ok(message) => {
                self.set_notice(Notice::info(message));
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                tracing::warn!("Plan action failed: {}", e);
                self.set_notice(Notice::error(e.to_string()));
                Ok(())
            }
        }
    }

    /// Roster members whose name matches the filter; digit keys index this list
    pub fn visible_roster(&self) -> Vec<&RosterEntry> {
        let needle = self.roster_filter.trim().to_lowercase();
        self.view
            .roster()
            .iter()
            .filter(|athlete| athlete.display_name().to_lowercase().contains(&needle))
            .collect()
    }

    fn selected_date(&self) -> chrono::NaiveDate {
        self.view.week().dates().as_slice()[self.cursor]
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        // Help overlay takes precedence
        if self.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return Action::None;
        }

        if self.editing.is_some() {
            self.handle_edit_key(key);
            return Action::None;
        }

        if self.filtering {
            self.handle_filter_key(key);
            return Action::None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }

            KeyCode::Char('?') => {
                self.show_help = true;
            }

            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }

            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor < 6 {
                    self.cursor += 1;
                }
            }

            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.column = match self.column {
                    PlanField::Prediction => PlanField::Actual,
                    PlanField::Actual => PlanField::Prediction,
                };
            }

            KeyCode::Enter | KeyCode::Char('e') => {
                if self.view.mode().is_editable() {
                    self.editing = Some(self.view.cell_text(self.selected_date(), self.column));
                } else {
                    self.set_notice(Notice::error(PlanError::ReadOnly.to_string()));
                }
            }

            KeyCode::Char(' ') => {
                let date = self.selected_date();
                let result = self.view.toggle_day(date).map(|_| ());
                self.report(result);
            }

            KeyCode::Char('[') => {
                let week = self.view.week().previous();
                self.change_week(week);
            }

            KeyCode::Char(']') => {
                let week = self.view.week().next();
                self.change_week(week);
            }

            KeyCode::Char('a') => {
                let result = self.view.toggle_all_athletes();
                self.report(result);
            }

            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let picked = self.visible_roster().get(index).map(|a| a.athlete_id);
                match picked {
                    Some(id) => {
                        let result = self.view.toggle_athlete(id).map(|_| ());
                        self.report(result);
                    }
                    None => self.set_notice(Notice::error(format!("No athlete #{} on the roster", c))),
                }
            }

            KeyCode::Char('/') => {
                if self.view.mode().is_coach() {
                    self.filtering = true;
                } else {
                    self.set_notice(Notice::error(PlanError::NotCoachMode.to_string()));
                }
            }

            KeyCode::Char('p') => return Action::Send(PlanField::Prediction),

            KeyCode::Char('s') => return Action::Send(PlanField::Actual),

            KeyCode::Char('r') | KeyCode::Char('R') => return Action::Reload,

            _ => {}
        }

        Action::None
    }

    fn handle_edit_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.editing = None;
            }
            KeyCode::Enter => {
                if let Some(text) = self.editing.take() {
                    let date = self.selected_date();
                    let result = self.view.edit(date, self.column, text);
                    self.report(result);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = self.editing.as_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.editing.as_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.filtering = false;
                self.roster_filter.clear();
            }
            KeyCode::Enter => {
                self.filtering = false;
            }
            KeyCode::Backspace => {
                self.roster_filter.pop();
            }
            KeyCode::Char(c) => self.roster_filter.push(c),
            _ => {}
        }
    }

    fn change_week(&mut self, week: crate::plan::IsoWeek) {
        if self.view.has_unsaved_edits() {
            self.set_notice(Notice::info("Unsaved edits discarded"));
        }
        self.view.set_week(week);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{
        AthleteId, CoachId, PlanEntry, PlanId, PlanRequest, RosterEntry, SendPlanRequest,
    };
    use crate::plan::{PlanBackend, ViewParams};
    use chrono::NaiveDate;

    /// Backend with an empty plan list and a three-athlete roster
    struct EmptyBackend;

    impl PlanBackend for EmptyBackend {
        async fn coach_plans(&self, _: CoachId) -> Result<Vec<PlanEntry>, ApiError> {
            Ok(Vec::new())
        }

        async fn athlete_plans(&self, _: AthleteId) -> Result<Vec<PlanEntry>, ApiError> {
            Ok(Vec::new())
        }

        async fn has_accepted_coach(&self, _: AthleteId) -> Result<bool, ApiError> {
            Ok(false)
        }

        async fn roster(&self, _: CoachId) -> Result<Vec<RosterEntry>, ApiError> {
            Ok([(101, "Ana"), (102, "Bo"), (103, "Bodil")]
                .into_iter()
                .map(|(id, name)| RosterEntry {
                    athlete_id: id,
                    name: Some(name.to_string()),
                    lastname: None,
                    relation_status: Some("ACCEPT".to_string()),
                })
                .collect())
        }

        async fn send_plan(&self, _: CoachId, _: &SendPlanRequest) -> Result<(), ApiError> {
            Ok(())
        }

        async fn create_plan(&self, _: &PlanRequest) -> Result<PlanEntry, ApiError> {
            Err(ApiError::ServerError("not used".to_string()))
        }

        async fn update_plan(&self, _: PlanId, _: &PlanRequest) -> Result<PlanEntry, ApiError> {
            Err(ApiError::ServerError("not used".to_string()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    async fn app(params: ViewParams) -> PlanApp {
        let view = WeekPlanView::open(&EmptyBackend, params, today()).await.unwrap();
        PlanApp::new(view, Duration::from_secs(2))
    }

    fn coach() -> ViewParams {
        ViewParams {
            coach_id: Some(7),
            ..ViewParams::default()
        }
    }

    #[tokio::test]
    async fn test_quit_and_help() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Char('?'));
        assert!(app.show_help);
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_cursor_stays_in_week() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Up);
        assert_eq!(app.cursor, 0);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.cursor, 6);
    }

    #[tokio::test]
    async fn test_space_selects_day_for_coach() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char(' '));

        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(app.view.day_selection().contains(tuesday));
    }

    #[tokio::test]
    async fn test_space_refused_for_solo_athlete() {
        let mut app = app(ViewParams {
            athlete_id: Some(5),
            ..ViewParams::default()
        })
        .await;

        app.handle_key(KeyCode::Char(' '));

        assert!(app.view.day_selection().is_empty());
        assert!(app.notice().is_some_and(Notice::is_error));
    }

    #[tokio::test]
    async fn test_edit_commits_draft() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Enter);
        for c in "Tempo".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Enter);

        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(app.view.cell_text(monday, PlanField::Prediction), "Temp");
        assert!(app.editing.is_none());
    }

    #[tokio::test]
    async fn test_digits_pick_roster_members() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Char('2'));
        assert!(app.view.athlete_selection().is_picked(102));

        app.handle_key(KeyCode::Char('9'));
        assert!(app.notice().is_some_and(Notice::is_error));
    }

    #[tokio::test]
    async fn test_filter_narrows_digit_keys() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Char('/'));
        for c in "BOD".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(!app.filtering);

        let names: Vec<String> = app.visible_roster().iter().map(|a| a.display_name()).collect();
        assert_eq!(names, vec!["Bodil"]);

        app.handle_key(KeyCode::Char('1'));
        assert!(app.view.athlete_selection().is_picked(103));
        assert!(!app.view.athlete_selection().is_picked(101));
    }

    #[tokio::test]
    async fn test_filter_keys_do_not_trigger_actions() {
        let mut app = app(coach()).await;

        app.handle_key(KeyCode::Char('/'));
        assert_eq!(app.handle_key(KeyCode::Char('p')), Action::None);
        assert_eq!(app.handle_key(KeyCode::Char('q')), Action::None);
        assert!(!app.should_quit);
        assert_eq!(app.roster_filter, "pq");

        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.roster_filter, "p");

        app.handle_key(KeyCode::Esc);
        assert!(!app.filtering);
        assert!(app.roster_filter.is_empty());
        assert_eq!(app.visible_roster().len(), 3);
    }

    #[tokio::test]
    async fn test_filter_refused_outside_coach_mode() {
        let mut app = app(ViewParams {
            athlete_id: Some(5),
            ..ViewParams::default()
        })
        .await;

        app.handle_key(KeyCode::Char('/'));

        assert!(!app.filtering);
        assert!(app.notice().is_some_and(Notice::is_error));
    }

    #[tokio::test]
    async fn test_week_keys_clear_day_selection() {
        let mut app = app(coach()).await;
        let start = app.view.week();

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char(']'));

        assert_eq!(app.view.week(), start.next());
        assert!(app.view.day_selection().is_empty());
    }

    #[tokio::test]
    async fn test_send_keys_return_actions() {
        let mut app = app(coach()).await;

        assert_eq!(app.handle_key(KeyCode::Char('p')), Action::Send(PlanField::Prediction));
        assert_eq!(app.handle_key(KeyCode::Char('s')), Action::Send(PlanField::Actual));
        assert_eq!(app.handle_key(KeyCode::Char('r')), Action::Reload);
    }

    #[tokio::test]
    async fn test_fatal_send_error_ends_view() {
        let mut app = app(coach()).await;

        assert!(app.finish_send(Err(PlanError::NotLoggedIn)).is_err());
        assert!(app.finish_send(Err(PlanError::NoDaysSelected)).is_ok());
        assert_eq!(
            app.notice().map(|n| n.message.as_str()),
            Some("Select at least one day")
        );
    }
}
