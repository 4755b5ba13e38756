use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;

use super::app::{Action, PlanApp};
use super::widgets;
use crate::plan::{Notice, PlanBackend};

/// Owns the terminal while the weekly plan view is open
pub struct PlanTerminal {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: PlanApp,
}

impl PlanTerminal {
    pub fn new(app: PlanApp) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        Ok(Self { terminal, app })
    }

    /// Run the event loop until the user quits or a fatal error occurs
    pub async fn run<B: PlanBackend>(&mut self, backend: &B) -> Result<()> {
        loop {
            self.app.tick();
            let app = &self.app;
            self.terminal.draw(|f| ui(f, app))?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == event::KeyEventKind::Press {
                        let action = self.app.handle_key(key.code);
                        self.perform(backend, action).await?;
                    }
                }
            }

            if self.app.should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn perform<B: PlanBackend>(&mut self, backend: &B, action: Action) -> Result<()> {
        match action {
            Action::None => Ok(()),
            Action::Send(field) => {
                self.app.set_notice(Notice::info(format!("Sending {}...", field)));
                let app = &self.app;
                self.terminal.draw(|f| ui(f, app))?;

                let result = self.app.view.send(backend, field).await;
                self.app.finish_send(result)
            }
            Action::Reload => {
                let result = self.app.view.reload(backend).await;
                self.app.finish_send(result.map(|_| "Plans reloaded".to_string()))
            }
        }
    }

    /// Cleanup terminal on exit
    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl Drop for PlanTerminal {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the UI
fn ui(f: &mut Frame, app: &PlanApp) {
    let size = f.area();
    let week = app.view.render();

    // Header, body, status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    let athlete_name = week.athlete.map(|id| {
        app.view
            .roster()
            .iter()
            .find(|a| a.athlete_id == id)
            .map(|a| a.display_name())
            .unwrap_or_else(|| format!("Athlete #{}", id))
    });
    widgets::render_header(main_chunks[0], f.buffer_mut(), &week, athlete_name.as_deref());

    let table_area = if week.roster_visible {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(main_chunks[1]);

        let filter = if app.filtering {
            Some(format!("{}▏", app.roster_filter))
        } else if !app.roster_filter.is_empty() {
            Some(app.roster_filter.clone())
        } else {
            None
        };
        widgets::render_roster(
            columns[1],
            f.buffer_mut(),
            &app.visible_roster(),
            app.view.athlete_selection(),
            week.athlete,
            filter.as_deref(),
        );
        columns[0]
    } else {
        main_chunks[1]
    };

    widgets::render_plan_table(
        table_area,
        f.buffer_mut(),
        &week,
        app.cursor,
        app.column,
        app.editing.as_deref(),
    );

    widgets::render_status_bar(main_chunks[2], f.buffer_mut(), app.notice(), app.view.mode());

    if app.show_help {
        let help_area = centered_rect(60, 80, size);
        widgets::render_help_overlay(help_area, f.buffer_mut(), app.view.mode());
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
