use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use chrono::Utc;
use crate::models::ContactStatus;
use crate::progress::{parse_when, task_progress, WindowProgress};
use super::app::{App, InputMode, ViewMode, InputField};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Status line
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Tasks => {
            let now = Utc::now();

            let rows: Vec<Row> = app
                .tasks
                .iter()
                .map(|t| {
                    let progress = task_progress(t, now);

                    let style = if !t.is_active {
                        Style::default().fg(Color::DarkGray)
                    } else if progress.today.complete {
                        Style::default().fg(Color::Green)
                    } else if progress.today.percent >= 50 {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Red)
                    };

                    Row::new(vec![
                        Cell::from(t.id.to_string()),
                        Cell::from(t.title.clone()),
                        Cell::from(t.target_value.to_string()),
                        Cell::from(window_label(&progress.today)),
                        Cell::from(window_label(&progress.yesterday)),
                        Cell::from(window_label(&progress.week)),
                        Cell::from(window_label(&progress.month)),
                        Cell::from(if t.is_active { "Yes" } else { "No" }),
                    ]).style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(7),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(6),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["ID", "Title", "Target", "Today", "Yesterday", "This Week", "Last 30 Days", "Active"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Leadboard - Tasks"))
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.state);
        }
        ViewMode::Contacts => {
            let rows: Vec<Row> = app
                .contacts
                .iter()
                .map(|c| {
                    let style = match c.status {
                        ContactStatus::ClosedWon => Style::default().fg(Color::Green),
                        ContactStatus::ClosedLost => Style::default().fg(Color::Red),
                        ContactStatus::Negotiating => Style::default().fg(Color::Yellow),
                        _ => Style::default(),
                    };

                    let country = c
                        .country
                        .as_ref()
                        .map(|country| country.name.clone())
                        .unwrap_or_default();
                    let created = parse_when(&c.created_at)
                        .map(|when| when.date_naive().to_string())
                        .unwrap_or_default();

                    Row::new(vec![
                        Cell::from(c.id.to_string()),
                        Cell::from(c.name.clone()),
                        Cell::from(c.company.clone()),
                        Cell::from(c.status.to_string()),
                        Cell::from(country),
                        Cell::from(created),
                    ]).style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(20),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(12),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["ID", "Name", "Company", "Status", "Country", "Created"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title("Leadboard - Contacts"))
                .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
                .highlight_symbol(">> ");

            f.render_stateful_widget(table, chunks[0], &mut app.contact_state);
        }
        ViewMode::Stats => {
            let title = match &app.stats_user {
                Some(user) => format!("Leadboard - Statistics for {}", user.name),
                None => "Leadboard - Statistics".to_string(),
            };
            let block = Block::default().borders(Borders::ALL).title(title);

            match &app.stats {
                Some(stats) => {
                    let rows = vec![
                        Row::new(vec![
                            Cell::from("Today"),
                            Cell::from(stats.today.to_string()),
                        ]),
                        Row::new(vec![
                            Cell::from("Last 7 Days"),
                            Cell::from(stats.last_week.to_string()),
                        ]),
                        Row::new(vec![
                            Cell::from("This Month"),
                            Cell::from(stats.this_month.to_string()),
                        ]),
                        Row::new(vec![
                            Cell::from("Monthly Average"),
                            Cell::from(format!("{:.1}", stats.monthly_average)),
                        ]),
                        Row::new(vec![
                            Cell::from("Lifetime"),
                            Cell::from(stats.lifetime.to_string()),
                        ]),
                        Row::new(vec![
                            Cell::from("Responded (This Month)"),
                            Cell::from(stats.responded_this_month.to_string()),
                        ]),
                        Row::new(vec![
                            Cell::from("Negotiating (This Month)"),
                            Cell::from(stats.negotiating_this_month.to_string()),
                        ]),
                        Row::new(vec![
                            Cell::from("Closed Won (This Year)"),
                            Cell::from(stats.won_this_year.to_string()),
                        ]).style(Style::default().fg(Color::Green)),
                        Row::new(vec![
                            Cell::from("Closed Won (Lifetime)"),
                            Cell::from(stats.won_lifetime.to_string()),
                        ]).style(Style::default().fg(Color::Green)),
                    ];

                    let widths = [Constraint::Length(26), Constraint::Length(12)];

                    let table = Table::new(rows, widths).block(block);
                    f.render_widget(table, chunks[0]);
                }
                None => {
                    let message = Paragraph::new(
                        "No acting user set. Pass --user or set LEADBOARD_USER, then press r.",
                    )
                    .block(block);
                    f.render_widget(message, chunks[0]);
                }
            }
        }
    }

    let status_style = if app.offline {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let status = Paragraph::new(app.status_line.as_str()).style(status_style);
    f.render_widget(status, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | Tab: View | r: Refresh | l: Log | t: Target | x: Toggle Active | a: Show Inactive | d: Del",
            ViewMode::Contacts => "q: Quit | Tab: View | r: Refresh | s: Cycle Status",
            ViewMode::Stats => "q: Quit | Tab: View | r: Refresh",
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    // Render Input Box if needed
    if app.input_mode == InputMode::Editing {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.input_field {
            InputField::LogAchieved => "Log Progress: Enter Achieved Value",
            InputField::Target => "Edit Daily Target",
            InputField::None => "Edit",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn window_label(window: &WindowProgress) -> String {
    format!("{}/{} ({}%)", window.achieved, window.target, window.percent)
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_keeps_the_popup_height() {
        let area = Rect::new(0, 0, 80, 24);
        let popup = centered_rect(60, 3, area);
        assert_eq!(popup.height, 3);
        assert!(popup.y > area.y);
        assert!(popup.width < area.width);
    }

    #[test]
    fn test_centered_rect_survives_a_short_terminal() {
        let area = Rect::new(0, 0, 20, 2);
        let popup = centered_rect(60, 3, area);
        assert!(popup.height <= area.height);
        assert!(popup.bottom() <= area.bottom());
        assert!(popup.right() <= area.right());
    }
}
