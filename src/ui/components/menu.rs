use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use rust_i18n::t;

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        fn item(key: &str, label: impl Into<String>, description: impl Into<String>) -> MenuItem {
            MenuItem {
                key: key.to_string(),
                label: label.into(),
                description: description.into(),
            }
        }
        Self {
            items: vec![
                item("1", t!("menu.meaning"), t!("menu.meaning_desc")),
                item("2", t!("menu.reading"), t!("menu.reading_desc")),
                item("3", t!("menu.pronunciation"), t!("menu.pronunciation_desc")),
                item("f", t!("menu.filter"), t!("menu.filter_desc")),
                item("p", t!("menu.progress"), t!("menu.progress_desc")),
                item("h", t!("menu.hangul"), t!("menu.hangul_desc")),
                item("c", t!("menu.settings"), t!("menu.settings_desc")),
                item("q", t!("menu.quit"), t!("menu.quit_desc")),
            ],
            selected: 0,
            theme,
        }
    }

    /// Same entries re-labelled, e.g. after a locale switch.
    pub fn relabel(&mut self) {
        let selected = self.selected;
        *self = Self::new(self.theme);
        self.selected = selected;
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.title").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.subtitle").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(
                    &*desc_text,
                    Style::default().fg(colors.muted()),
                )),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        let last = menu.items.len() - 1;
        menu.prev();
        assert_eq!(menu.selected, last);
        menu.next();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn relabel_keeps_selection() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.next();
        menu.next();
        menu.relabel();
        assert_eq!(menu.selected, 2);
        assert_eq!(menu.items[7].key, "q");
    }
}
