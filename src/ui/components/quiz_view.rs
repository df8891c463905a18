use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use hanquiz::generator::{QuestionKind, QuizType};
use hanquiz::session::{Phase, QuizSession};

use crate::ui::theme::Theme;

pub fn quiz_type_label(quiz_type: QuizType) -> String {
    match quiz_type {
        QuizType::Meaning => t!("quiz_type.meaning").to_string(),
        QuizType::Reading => t!("quiz_type.reading").to_string(),
        QuizType::Pronunciation => t!("quiz_type.pronunciation").to_string(),
    }
}

pub struct QuizView<'a> {
    session: &'a QuizSession,
    theme: &'a Theme,
}

impl<'a> QuizView<'a> {
    pub fn new(session: &'a QuizSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(question) = self.session.current() else {
            return;
        };

        let in_review = self.session.phase() == Phase::Review;
        let (current, total) = self.session.position();
        let mut title = vec![
            Span::styled(
                format!(" {} ", quiz_type_label(question.quiz_type())),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                t!("quiz.counter", current = current, total = total).to_string(),
                Style::default().fg(colors.muted()),
            ),
        ];
        if in_review {
            title.push(Span::styled(
                format!(" [{}] ", t!("quiz.review_badge")),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(Style::default().fg(if in_review {
                colors.warning()
            } else {
                colors.border_focused()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(inner);

        let ask = match &question.kind {
            QuestionKind::Meaning { .. } => t!("quiz.prompt_meaning"),
            QuestionKind::Reading { .. } => t!("quiz.prompt_reading"),
            QuestionKind::Pronunciation { .. } => t!("quiz.prompt_pronunciation"),
        };
        Paragraph::new(Line::from(Span::styled(
            ask.to_string(),
            Style::default().fg(colors.muted()),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let mut prompt_lines = vec![Line::from(Span::styled(
            question.prompt.clone(),
            Style::default()
                .fg(colors.highlight())
                .add_modifier(Modifier::BOLD),
        ))];
        if let QuestionKind::Pronunciation { context, .. } = &question.kind {
            prompt_lines.push(Line::from(Span::styled(
                t!("quiz.example", word = context.korean, meaning = context.japanese).to_string(),
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(prompt_lines)
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        let answer = self.session.pending_answer();
        let option_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                question
                    .options
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[3]);

        for (i, option) in question.options.iter().enumerate() {
            let style = match answer {
                Some(_) if question.is_correct(i) => Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
                Some(a) if a.chosen == i => Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::CROSSED_OUT),
                Some(_) => Style::default().fg(colors.muted()),
                None => Style::default().fg(colors.fg()),
            };
            let marker = match answer {
                Some(_) if question.is_correct(i) => "✓",
                Some(a) if a.chosen == i => "✗",
                _ => " ",
            };
            let line = Line::from(vec![
                Span::styled(format!("  {marker} [{}] ", i + 1), Style::default().fg(colors.accent())),
                Span::styled(option.clone(), style),
            ]);
            if i < option_rows.len() {
                Paragraph::new(line).render(option_rows[i], buf);
            }
        }

        if let Some(answer) = answer {
            let (text, color) = if answer.correct {
                (t!("quiz.correct").to_string(), colors.success())
            } else {
                (
                    t!("quiz.incorrect", answer = question.correct_answer).to_string(),
                    colors.error(),
                )
            };
            let last = self.session.finishes_on_advance();
            let next = if last {
                t!("quiz.see_result")
            } else {
                t!("quiz.next")
            };
            let lines = vec![
                Line::from(Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("[Enter] {next}"),
                    Style::default().fg(colors.muted()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(layout[4], buf);
        }
    }
}
