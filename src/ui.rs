pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Widget, Wrap},
};

use crate::app::App;
use crate::clock::Clock;
use crate::notification::Severity;
use crate::presenter::TABLE_HEADERS;
use crate::session::SessionStatus;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const NOTIFICATION_LINES: u16 = 4;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),                      // title
                Constraint::Length(3),                      // progress
                Constraint::Length(1),                      // timer
                Constraint::Min(8),                         // table + chart
                Constraint::Length(1),                      // summary
                Constraint::Length(NOTIFICATION_LINES + 2), // notifications
                Constraint::Length(1),                      // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "Real-Time Breath Acetone Analysis Tool",
            bold_style.fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let state = self.controller.state();

        let status_color = match state.status {
            SessionStatus::Running => Color::Green,
            SessionStatus::Paused => Color::Yellow,
            SessionStatus::Idle | SessionStatus::Stopped => Color::Gray,
        };
        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", state.status)),
            )
            .gauge_style(Style::default().fg(status_color))
            .ratio(state.progress.clamp(0.0, 1.0))
            .label(format!("{:.0}%", state.progress * 100.0))
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!("Time Remaining: {:.2} s", state.remaining),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(56), Constraint::Min(20)])
            .split(chunks[3]);

        render_table(self, body[0], buf);
        charting::render_chart(self.controller.presenter().chart(), body[1], buf);

        let summary = match self.controller.presenter().acetone_summary() {
            Some(s) => format!(
                "acetone last {:.3} ppm   mean {:.3} ppm   sd {:.3}   samples {}",
                s.last,
                s.mean,
                s.std_dev,
                state.samples.len()
            ),
            None => String::from("no samples yet"),
        };
        Paragraph::new(Span::styled(summary, italic_style.fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let lines: Vec<Line> = self
            .notifications()
            .take(NOTIFICATION_LINES as usize)
            .map(|n| {
                let color = match n.notification.severity() {
                    Severity::Info => Color::Green,
                    Severity::Warning => Color::Red,
                };
                Line::from(vec![
                    Span::styled(
                        format!("{} ", n.at.format("%H:%M:%S")),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::styled(format!("{}: ", n.notification.title()), bold_style.fg(color)),
                    Span::raw(n.notification.to_string()),
                ])
            })
            .collect();
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Notifications "))
            .wrap(Wrap { trim: true })
            .render(chunks[5], buf);

        Paragraph::new(Span::styled(
            "(s)tart / (p)ause / (r)eset / (q)uit",
            italic_style,
        ))
        .render(chunks[6], buf);
    }
}

/// Table of samples, scrolled so the newest row stays visible
fn render_table<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let rows = app.controller.presenter().rows();
    // borders and header
    let visible = area.height.saturating_sub(3) as usize;
    let skip = rows.len().saturating_sub(visible);

    let header = Row::new(TABLE_HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let body: Vec<Row> = rows
        .iter()
        .skip(skip)
        .map(|r| Row::new(r.iter().map(|v| Cell::from(v.as_str()))))
        .collect();

    Table::new(
        body,
        [
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Readings ({}) ", rows.len())),
    )
    .render(area, buf);
}
