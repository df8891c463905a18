use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use hanquiz::engine::{Bucket, UserProgress};
use hanquiz::store::schema::HistoryData;
use hanquiz::vocabulary::{Vocabulary, level_rank};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::quiz_view::quiz_type_label;
use crate::ui::theme::Theme;

const MAX_MISTAKEN_SHOWN: usize = 10;
const MAX_HISTORY_SHOWN: usize = 5;
const LABEL_WIDTH: u16 = 28;

enum Row {
    Heading(String),
    Bar {
        label: String,
        percent: u32,
        color: Color,
    },
    Text(Line<'static>),
    Blank,
}

/// Levels easiest first; unknown levels after the known ones, by name.
pub fn sorted_levels(progress: &UserProgress) -> Vec<&Bucket> {
    let mut levels: Vec<&Bucket> = progress.levels.values().collect();
    levels.sort_by(|a, b| {
        level_rank(&a.name)
            .cmp(&level_rank(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });
    levels
}

pub fn sorted_categories(progress: &UserProgress) -> Vec<&Bucket> {
    let mut categories: Vec<&Bucket> = progress.categories.values().collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    categories
}

pub struct ProgressDashboard<'a> {
    progress: &'a UserProgress,
    history: &'a HistoryData,
    vocabulary: &'a Vocabulary,
    mistake_threshold: u32,
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> ProgressDashboard<'a> {
    pub fn new(
        progress: &'a UserProgress,
        history: &'a HistoryData,
        vocabulary: &'a Vocabulary,
        theme: &'a Theme,
    ) -> Self {
        Self {
            progress,
            history,
            vocabulary,
            mistake_threshold: 1,
            scroll: 0,
            theme,
        }
    }

    pub fn mistake_threshold(mut self, threshold: u32) -> Self {
        self.mistake_threshold = threshold;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn bucket_row(bucket: &Bucket, color: Color) -> Row {
        Row::Bar {
            label: t!(
                "progress.words",
                name = bucket.name,
                correct = bucket.correct_words,
                total = bucket.total_words
            )
            .to_string(),
            percent: bucket.progress_percentage,
            color,
        }
    }

    fn rows(&self) -> Vec<Row> {
        let colors = &self.theme.colors;
        let p = self.progress;
        let mut rows = vec![
            Row::Heading(t!("progress.overall").to_string()),
            Row::Bar {
                label: String::new(),
                percent: p.overall_progress(),
                color: colors.accent(),
            },
            Row::Text(Line::from(Span::styled(
                t!(
                    "progress.last_updated",
                    time = p
                        .last_updated
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                )
                .to_string(),
                Style::default().fg(colors.muted()),
            ))),
            Row::Blank,
            Row::Heading(t!("progress.levels").to_string()),
        ];
        rows.extend(
            sorted_levels(p)
                .into_iter()
                .map(|b| Self::bucket_row(b, colors.level(&b.name))),
        );

        rows.push(Row::Blank);
        rows.push(Row::Heading(t!("progress.categories").to_string()));
        rows.extend(
            sorted_categories(p)
                .into_iter()
                .map(|b| Self::bucket_row(b, colors.category(&b.name))),
        );

        rows.push(Row::Blank);
        rows.push(Row::Heading(t!("progress.mistaken").to_string()));
        let mistaken = p.frequently_mistaken(self.mistake_threshold);
        if mistaken.is_empty() {
            rows.push(Row::Text(Line::from(Span::styled(
                t!("progress.none").to_string(),
                Style::default().fg(colors.muted()),
            ))));
        }
        for korean in mistaken.iter().take(MAX_MISTAKEN_SHOWN) {
            let meaning = self
                .vocabulary
                .get(korean)
                .map(|w| w.japanese.clone())
                .unwrap_or_default();
            rows.push(Row::Text(Line::from(vec![
                Span::styled(
                    format!("  {korean}  "),
                    Style::default()
                        .fg(colors.highlight())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{meaning}  "), Style::default().fg(colors.fg())),
                Span::styled(
                    t!("progress.mistake_count", count = p.mistake_count(korean)).to_string(),
                    Style::default().fg(colors.error()),
                ),
            ])));
        }

        rows.push(Row::Blank);
        rows.push(Row::Heading(t!("progress.history").to_string()));
        if self.history.results.is_empty() {
            rows.push(Row::Text(Line::from(Span::styled(
                t!("progress.no_history").to_string(),
                Style::default().fg(colors.muted()),
            ))));
        }
        for result in self.history.results.iter().rev().take(MAX_HISTORY_SHOWN) {
            rows.push(Row::Text(Line::from(vec![
                Span::styled(
                    format!(
                        "  {}  ",
                        result.timestamp.with_timezone(&Local).format("%m-%d %H:%M")
                    ),
                    Style::default().fg(colors.muted()),
                ),
                Span::styled(
                    format!("{:<8}", quiz_type_label(result.quiz_type)),
                    Style::default().fg(colors.accent()),
                ),
                Span::styled(
                    format!(
                        "{}/{} ({:.0}%)",
                        result.correct,
                        result.total,
                        result.accuracy()
                    ),
                    Style::default().fg(colors.fg()),
                ),
            ])));
        }
        rows
    }

    /// Rows available to scroll through, for clamping the scroll offset.
    pub fn row_count(&self) -> usize {
        self.rows().len()
    }
}

impl Widget for ProgressDashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("progress.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = self.rows();
        for (offset, row) in rows
            .into_iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            let line_area = Rect::new(inner.x, inner.y + offset as u16, inner.width, 1);
            match row {
                Row::Heading(text) => {
                    Paragraph::new(Line::from(Span::styled(
                        text,
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    )))
                    .render(line_area, buf);
                }
                Row::Bar {
                    label,
                    percent,
                    color,
                } => {
                    ProgressBar::percent(&format!("  {label}"), percent, self.theme)
                        .color(color)
                        .inline(LABEL_WIDTH)
                        .render(line_area, buf);
                }
                Row::Text(line) => Paragraph::new(line).render(line_area, buf),
                Row::Blank => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hanquiz::vocabulary::Word;

    fn progress() -> UserProgress {
        let words = vec![
            Word::new("a", "x", "p", "食事", "上級"),
            Word::new("b", "x", "p", "挨拶", "初級"),
            Word::new("c", "x", "p", "数字", "特級"),
            Word::new("d", "x", "p", "挨拶", "中級"),
        ];
        UserProgress::from_vocabulary(&words, Utc::now())
    }

    #[test]
    fn levels_follow_rank_then_name() {
        let p = progress();
        let names: Vec<&str> = sorted_levels(&p).iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["初級", "中級", "上級", "特級"]);
    }

    #[test]
    fn categories_sorted_by_name() {
        let p = progress();
        let names: Vec<&str> = sorted_categories(&p)
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(names, expected);
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn renders_without_panicking_in_tiny_area() {
        let p = progress();
        let history = HistoryData::default();
        let vocabulary = Vocabulary::default();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        ProgressDashboard::new(&p, &history, &vocabulary, &theme)
            .scroll(3)
            .render(area, &mut buf);
    }
}
