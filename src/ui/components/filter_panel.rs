use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use hanquiz::engine::{FilterSummary, StudyFilter};

use crate::ui::theme::Theme;

/// One selectable line of the filter screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterRow {
    MistakesOnly,
    Category(String),
    Level(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterSection {
    Mistakes,
    Categories,
    Levels,
}

impl FilterRow {
    pub fn section(&self) -> FilterSection {
        match self {
            FilterRow::MistakesOnly => FilterSection::Mistakes,
            FilterRow::Category(_) => FilterSection::Categories,
            FilterRow::Level(_) => FilterSection::Levels,
        }
    }
}

/// The mistakes-only toggle is offered only when there are mistakes to show.
pub fn filter_rows(categories: &[String], levels: &[String], mistakes_available: bool) -> Vec<FilterRow> {
    let mut rows = Vec::with_capacity(categories.len() + levels.len() + 1);
    if mistakes_available {
        rows.push(FilterRow::MistakesOnly);
    }
    rows.extend(categories.iter().cloned().map(FilterRow::Category));
    rows.extend(levels.iter().cloned().map(FilterRow::Level));
    rows
}

pub fn summary_text(summary: FilterSummary) -> String {
    match summary {
        FilterSummary::AllWords => t!("filter.summary_all").to_string(),
        FilterSummary::Categories(n) => t!("filter.summary_categories", count = n).to_string(),
        FilterSummary::Levels(n) => t!("filter.summary_levels", count = n).to_string(),
        FilterSummary::CategoriesAndLevels(c, l) => {
            t!("filter.summary_both", categories = c, levels = l).to_string()
        }
    }
}

pub struct FilterPanel<'a> {
    filter: &'a StudyFilter,
    rows: &'a [FilterRow],
    selected: usize,
    summary: String,
    pool_size: usize,
    theme: &'a Theme,
}

impl<'a> FilterPanel<'a> {
    pub fn new(
        filter: &'a StudyFilter,
        rows: &'a [FilterRow],
        selected: usize,
        summary: String,
        pool_size: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            filter,
            rows,
            selected,
            summary,
            pool_size,
            theme,
        }
    }

    fn is_checked(&self, row: &FilterRow) -> bool {
        match row {
            FilterRow::MistakesOnly => self.filter.show_mistakes_only,
            FilterRow::Category(c) => self.filter.categories.contains(c),
            FilterRow::Level(l) => self.filter.levels.contains(l),
        }
    }
}

impl Widget for FilterPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("filter.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = vec![
            Line::from(vec![
                Span::styled(
                    format!(" {} ", self.summary),
                    Style::default()
                        .fg(colors.highlight())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", t!("filter.pool", count = self.pool_size)),
                    Style::default().fg(colors.muted()),
                ),
            ]),
            Line::from(""),
        ];
        // Index of the selected row within `lines`, for scrolling.
        let mut selected_line = 0;

        let mut section: Option<FilterSection> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if section != Some(row.section()) {
                section = Some(row.section());
                let heading = match row.section() {
                    FilterSection::Mistakes => String::new(),
                    FilterSection::Categories => t!("filter.categories").to_string(),
                    FilterSection::Levels => t!("filter.levels").to_string(),
                };
                if !heading.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!(" {heading}"),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    )));
                }
            }

            let is_selected = i == self.selected;
            if is_selected {
                selected_line = lines.len();
            }
            let checkbox = if self.is_checked(row) { "[x]" } else { "[ ]" };
            let label = match row {
                FilterRow::MistakesOnly => t!("filter.mistakes_only").to_string(),
                FilterRow::Category(name) => name.clone(),
                FilterRow::Level(name) => name.clone(),
            };
            let style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let indicator = if is_selected { ">" } else { " " };
            lines.push(Line::from(Span::styled(
                format!(" {indicator} {checkbox} {label}"),
                style,
            )));
        }

        let height = inner.height as usize;
        let scroll = selected_line.saturating_sub(height.saturating_sub(1));
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
