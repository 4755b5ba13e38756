// Terminal UI module using ratatui

mod app;
mod dashboard;
mod widgets;

use anyhow::Result;
use std::time::Duration;

use crate::config::UiConfig;
use crate::plan::{PlanBackend, WeekPlanView};

pub use app::{Action, PlanApp};
pub use dashboard::PlanTerminal;

/// Open the interactive view over `view` and block until the user quits
pub async fn run<B: PlanBackend>(backend: B, view: WeekPlanView, ui: &UiConfig) -> Result<()> {
    let app = PlanApp::new(view, Duration::from_secs(ui.notice_seconds));
    let mut terminal = PlanTerminal::new(app)?;

    let result = terminal.run(&backend).await;
    terminal.cleanup()?;
    result
}
