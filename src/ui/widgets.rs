use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Widget},
};

use crate::models::{AthleteId, PlanField, RosterEntry};
use crate::plan::{AthleteSelection, CellView, Notice, ViewMode, WeekView};

/// Render title, week and focused athlete
pub fn render_header(area: Rect, buf: &mut Buffer, week: &WeekView, athlete: Option<&str>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", week.title))
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    block.render(area, buf);

    let mut spans = vec![
        Span::styled("Week ", Style::default().fg(Color::Gray)),
        Span::styled(
            week.week.to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} to {}",
                week.week.dates().first(),
                week.week.dates().last()
            ),
            Style::default().fg(Color::Gray),
        ),
    ];

    if let Some(name) = athlete {
        spans.push(Span::styled("   Athlete: ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            name.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut lines = vec![Line::from(spans)];
    if week.back_visible {
        lines.push(Line::from(Span::styled(
            "q to go back",
            Style::default().fg(Color::DarkGray),
        )));
    }

    Paragraph::new(lines).render(inner, buf);
}

fn cell_style(cell: &CellView) -> Style {
    match cell {
        CellView::ReadOnly { text: None, .. } => Style::default().fg(Color::DarkGray),
        CellView::Editable { dirty: true, .. } => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::White),
    }
}

/// Render the seven day rows
pub fn render_plan_table(
    area: Rect,
    buf: &mut Buffer,
    week: &WeekView,
    cursor: usize,
    column: PlanField,
    editing: Option<&str>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Plan ")
        .border_style(Style::default().fg(Color::Gray));

    let header = Row::new(vec!["", "Day", "Date", "Prediction", "Actual"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = week
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let on_cursor = idx == cursor;

            let text_cell = |cell: &CellView, field: PlanField| {
                let focused = on_cursor && field == column;
                let text = match editing {
                    Some(buffer) if focused => format!("{}▏", buffer),
                    _ => cell.display().to_string(),
                };
                let mut style = cell_style(cell);
                if focused {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(Span::styled(text, style))
            };

            let mark = if row.selected { "●" } else { " " };
            let day_style = if on_cursor {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(Span::styled(mark, Style::default().fg(Color::Green))),
                Cell::from(Span::styled(row.weekday, day_style)),
                Cell::from(row.date.format("%d/%m").to_string()),
                text_cell(&row.prediction, PlanField::Prediction),
                text_cell(&row.actual, PlanField::Actual),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Percentage(45),
            Constraint::Percentage(45),
        ],
    )
    .header(header)
    .block(block);

    Widget::render(table, area, buf);
}

/// Render the coach's accepted athletes with their selection state
pub fn render_roster(
    area: Rect,
    buf: &mut Buffer,
    roster: &[&RosterEntry],
    selection: &AthleteSelection,
    focus: Option<AthleteId>,
    filter: Option<&str>,
) {
    let mut title = if selection.is_all() {
        " Athletes (all) ".to_string()
    } else {
        " Athletes ".to_string()
    };
    if let Some(text) = filter {
        title.push_str(&format!("/{} ", text));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    if roster.is_empty() {
        let message = if filter.is_some() {
            "No athlete matches the filter."
        } else {
            "No accepted athletes yet."
        };
        Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
        return;
    }

    let items: Vec<ListItem> = roster
        .iter()
        .enumerate()
        .map(|(idx, athlete)| {
            let check = if selection.is_picked(athlete.athlete_id) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if Some(athlete.athlete_id) == focus {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let key = if idx < 9 {
                format!("{}", idx + 1)
            } else {
                " ".to_string()
            };

            ListItem::new(Line::from(Span::styled(
                format!("{} {} {}", key, check, athlete.display_name()),
                style,
            )))
        })
        .collect();

    List::new(items).render(inner, buf);
}

/// Render help overlay
pub fn render_help_overlay(area: Rect, buf: &mut Buffer, mode: ViewMode) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let section = |name: &'static str| Line::from(Span::styled(name, Style::default().fg(Color::Cyan)));

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation:"),
        Line::from("  ↑/k ↓/j  - Move between days"),
        Line::from("  Tab ←/→  - Switch prediction/actual"),
        Line::from("  [ / ]    - Previous/next week"),
        Line::from("  r        - Reload plans"),
    ];

    if mode.is_editable() {
        help_text.push(Line::from(""));
        help_text.push(section("Editing:"));
        help_text.push(Line::from("  Enter/e  - Edit cell, Enter to keep, Esc to cancel"));
    }

    if mode.is_coach() {
        help_text.push(Line::from("  Space    - Select day"));
        help_text.push(Line::from("  a        - Select all athletes"));
        help_text.push(Line::from("  1-9      - Select athlete"));
        help_text.push(Line::from("  /        - Filter athletes by name"));
        help_text.push(Line::from("  p        - Send prediction"));
        help_text.push(Line::from("  s        - Send actual"));
    } else if mode.is_editable() {
        help_text.push(Line::from("  p        - Save predictions"));
        help_text.push(Line::from("  s        - Save actuals"));
    }

    help_text.push(Line::from(""));
    help_text.push(section("Other:"));
    help_text.push(Line::from("  ?        - Toggle this help"));
    help_text.push(Line::from("  q        - Quit"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        "Press ? or ESC to close",
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(help_text).render(inner, buf);
}

/// Render status bar at bottom
pub fn render_status_bar(area: Rect, buf: &mut Buffer, notice: Option<&Notice>, mode: ViewMode) {
    let status = match notice {
        Some(notice) if notice.is_error() => Span::styled(
            format!(" ⚠ {} ", notice.message),
            Style::default().fg(Color::Red).bg(Color::DarkGray),
        ),
        Some(notice) => Span::styled(
            format!(" ✓ {} ", notice.message),
            Style::default().fg(Color::Green).bg(Color::DarkGray),
        ),
        None if !mode.is_editable() => Span::styled(
            " Read-only ",
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        ),
        None => Span::styled(" ", Style::default().bg(Color::DarkGray)),
    };

    let help_hint = Span::styled(
        " Press ? for help ",
        Style::default().fg(Color::Gray).bg(Color::DarkGray),
    );

    Paragraph::new(Line::from(vec![status, help_hint])).render(area, buf);
}
