use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap};

use crate::display::{format_ms, sanitize_display};
use crate::state::{ProbeOutcome, ProbeStatus, RunningStatistics, Session};
use crate::tui::theme::Theme;

/// Full live frame: header, latency scatter, statistics and last outcome
pub struct LiveView<'a> {
    session: &'a Session,
    stats: &'a RunningStatistics,
    theme: &'a Theme,
}

impl<'a> LiveView<'a> {
    pub fn new(session: &'a Session, stats: &'a RunningStatistics, theme: &'a Theme) -> Self {
        Self {
            session,
            stats,
            theme,
        }
    }

    /// (sequence, latency) for every successful probe
    fn reply_points(&self) -> Vec<(f64, f64)> {
        self.session
            .snapshot()
            .iter()
            .filter_map(|o| o.latency_ms.map(|ms| (o.sequence as f64, ms)))
            .collect()
    }

    /// Failed probes pinned to the x axis, outside the latency scale
    fn lost_points(&self) -> Vec<(f64, f64)> {
        self.session
            .snapshot()
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| (o.sequence as f64, 0.0))
            .collect()
    }

    fn render_chart(&self, area: Rect, buf: &mut Buffer) {
        let replies = self.reply_points();
        let lost = self.lost_points();

        let x_max = (self.stats.sent as f64 + 1.0).max(2.0);
        let y_max = self.stats.plot_ceiling();

        let datasets = vec![
            Dataset::default()
                .name("reply")
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(self.theme.plot))
                .data(&replies),
            Dataset::default()
                .name("lost")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(self.theme.error))
                .data(&lost),
        ];

        let axis_style = Style::default().fg(self.theme.axis);
        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(" Ping latency (ms) over time ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border)),
            )
            .x_axis(
                Axis::default()
                    .title("Probe #")
                    .style(axis_style)
                    .bounds([1.0, x_max])
                    .labels(axis_labels(1.0, x_max, 0)),
            )
            .y_axis(
                Axis::default()
                    .title("ms")
                    .style(axis_style)
                    .bounds([0.0, y_max])
                    .labels(axis_labels(0.0, y_max, 1)),
            );

        chart.render(area, buf);
    }

    fn stats_lines(&self) -> Vec<Line<'static>> {
        let loss_style = if self.stats.loss_pct > 50.0 {
            Style::default().fg(self.theme.error)
        } else if self.stats.loss_pct > 10.0 {
            Style::default().fg(self.theme.warning)
        } else {
            Style::default().fg(self.theme.success)
        };

        let mut lines = vec![Line::from(vec![
            Span::styled("Sent: ", Style::default().fg(self.theme.text_dim)),
            Span::raw(self.stats.sent.to_string()),
            Span::styled(" | Lost: ", Style::default().fg(self.theme.text_dim)),
            Span::raw(self.stats.lost.to_string()),
            Span::styled(format!(" ({:.1}% loss)", self.stats.loss_pct), loss_style),
        ])];

        if self.stats.avg_ms.is_some() {
            lines.push(Line::from(vec![
                Span::styled("Latency (ms) -> ", Style::default().fg(self.theme.text_dim)),
                Span::raw(format!(
                    "Min: {} | Max: {} | Avg: {}",
                    format_ms(self.stats.min_ms),
                    format_ms(self.stats.max_ms),
                    format_ms(self.stats.avg_ms)
                )),
            ]));
        }

        lines
    }

    fn last_outcome_lines(&self, last: &ProbeOutcome) -> Vec<Line<'static>> {
        let label = Span::styled(
            format!("Last probe #{}: ", last.sequence),
            Style::default().fg(self.theme.text_dim),
        );

        match last.status {
            ProbeStatus::Success => vec![Line::from(vec![
                label,
                Span::styled(
                    format!("{} ms", format_ms(last.latency_ms)),
                    Style::default()
                        .fg(self.theme.success)
                        .add_modifier(Modifier::BOLD),
                ),
            ])],
            ProbeStatus::Failed => {
                let kind = last.failure.map(|f| f.label()).unwrap_or("failed");
                let mut lines = vec![Line::from(vec![
                    label,
                    Span::styled(
                        format!("FAILED ({})", kind),
                        Style::default()
                            .fg(self.theme.error)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])];
                if let Some(ref diagnostic) = last.diagnostic {
                    let flat = diagnostic.replace(['\r', '\n'], " ");
                    lines.push(Line::from(Span::styled(
                        format!("  {}", sanitize_display(&flat)),
                        Style::default().fg(self.theme.warning),
                    )));
                }
                lines
            }
        }
    }
}

/// Three evenly spaced tick labels across `[min, max]`
fn axis_labels(min: f64, max: f64, precision: usize) -> Vec<String> {
    let mid = (min + max) / 2.0;
    [min, mid, max]
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect()
}

impl Widget for LiveView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " liveping \u{2500}\u{2500} PING {} \u{2500}\u{2500} since {} ",
            self.session.target,
            self.session.started_at.format("%H:%M:%S")
        );
        let block = Block::default()
            .title(Span::styled(title, Style::default().fg(self.theme.header)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // instructions
                Constraint::Min(6),    // chart
                Constraint::Length(2), // statistics
                Constraint::Length(3), // last outcome
            ])
            .split(inner);

        Paragraph::new(Line::from(vec![
            Span::raw("Press "),
            Span::styled("Ctrl+C", Style::default().fg(self.theme.shortcut)),
            Span::raw(" or "),
            Span::styled("q", Style::default().fg(self.theme.shortcut)),
            Span::raw(" to stop and write the reports."),
        ]))
        .style(Style::default().fg(self.theme.text))
        .render(chunks[0], buf);

        self.render_chart(chunks[1], buf);

        Paragraph::new(self.stats_lines())
            .style(Style::default().fg(self.theme.text))
            .render(chunks[2], buf);

        let last_lines = match self.session.last() {
            Some(last) => self.last_outcome_lines(last),
            None => vec![Line::from(Span::styled(
                "Waiting for the first reply...",
                Style::default().fg(self.theme.text_dim),
            ))],
        };
        Paragraph::new(last_lines)
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);
    }
}
