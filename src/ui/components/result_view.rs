use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use hanquiz::session::QuizResult;

use crate::ui::components::quiz_view::quiz_type_label;
use crate::ui::theme::Theme;

pub struct ResultView<'a> {
    result: &'a QuizResult,
    theme: &'a Theme,
}

impl<'a> ResultView<'a> {
    pub fn new(result: &'a QuizResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }
}

impl Widget for ResultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let block = Block::bordered()
            .title(format!(
                " {} - {} ",
                t!("result.title"),
                quiz_type_label(result.quiz_type)
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let score_color = if result.is_perfect() {
            colors.success()
        } else if result.accuracy() >= 60.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("result.score", correct = result.correct, total = result.total).to_string(),
                Style::default()
                    .fg(score_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("result.accuracy", pct = format!("{:.0}", result.accuracy())).to_string(),
                Style::default().fg(colors.fg()),
            )),
        ];

        if result.is_perfect() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                t!("result.perfect").to_string(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
        }

        if result.review_total > 0 {
            lines.push(Line::from(Span::styled(
                t!(
                    "result.review",
                    correct = result.review_correct,
                    total = result.review_total
                )
                .to_string(),
                Style::default().fg(colors.warning()),
            )));
        }

        if !result.missed.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                t!("result.missed").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                result.missed.join("  "),
                Style::default().fg(colors.error()),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
