use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Row, Table, Widget};
use rust_i18n::t;

use hanquiz::generator::hangul::{
    BASIC_VOWELS, COMPOUND_VOWELS, FINAL_CONSONANTS, INITIAL_CONSONANTS, Jamo,
};

use crate::ui::theme::Theme;

pub struct HangulTable<'a> {
    theme: &'a Theme,
}

impl<'a> HangulTable<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn section(&self, title: String, letters: &[&Jamo]) -> Table<'static> {
        let colors = &self.theme.colors;
        let header = Row::new(vec![
            t!("hangul.column_letter").to_string(),
            t!("hangul.column_sound").to_string(),
            t!("hangul.column_roman").to_string(),
        ])
        .style(Style::default().fg(colors.muted()));
        let rows = letters.iter().map(|j| {
            Row::new(vec![
                Span::styled(
                    j.grapheme.to_string(),
                    Style::default()
                        .fg(colors.highlight())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(j.japanese, Style::default().fg(colors.fg())),
                Span::styled(j.romanization, Style::default().fg(colors.fg())),
            ])
        });
        Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Min(6),
            ],
        )
        .header(header)
        .block(
            Block::bordered()
                .title(format!(" {title} "))
                .border_style(Style::default().fg(colors.border())),
        )
    }
}

impl Widget for HangulTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("hangul.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(inner);

        let initials: Vec<&Jamo> = INITIAL_CONSONANTS.iter().collect();
        let vowels: Vec<&Jamo> = BASIC_VOWELS.iter().chain(COMPOUND_VOWELS.iter()).collect();
        let finals: Vec<&Jamo> = FINAL_CONSONANTS.iter().collect();

        self.section(t!("hangul.initials").to_string(), &initials)
            .render(columns[0], buf);
        self.section(t!("hangul.vowels").to_string(), &vowels)
            .render(columns[1], buf);
        self.section(t!("hangul.finals").to_string(), &finals)
            .render(columns[2], buf);
    }
}
