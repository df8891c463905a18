use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub theme: &'a Theme,
    color: Option<Color>,
    /// Width of the inline label column; `None` draws a bordered bar.
    inline_label: Option<u16>,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            theme,
            color: None,
            inline_label: None,
        }
    }

    /// From a whole-number percentage.
    pub fn percent(label: &str, percent: u32, theme: &'a Theme) -> Self {
        Self::new(label, f64::from(percent) / 100.0, theme)
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Single row: label on the left, bar on the right.
    pub fn inline(mut self, label_width: u16) -> Self {
        self.inline_label = Some(label_width);
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let fill = self.color.unwrap_or_else(|| colors.bar_filled());

        let bar = match self.inline_label {
            Some(label_width) => {
                if area.width == 0 || area.height == 0 {
                    return;
                }
                let label_width = label_width.min(area.width / 2);
                buf.set_stringn(
                    area.x,
                    area.y,
                    &self.label,
                    label_width as usize,
                    Style::default().fg(colors.fg()),
                );
                Rect::new(area.x + label_width, area.y, area.width - label_width, 1)
            }
            None => {
                let block = Block::bordered()
                    .title(format!(" {} ", self.label))
                    .border_style(Style::default().fg(colors.border()));
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
        };

        if bar.width == 0 || bar.height == 0 {
            return;
        }

        let filled_width = (self.ratio * bar.width as f64) as u16;
        let label = format!("{:.0}%", self.ratio * 100.0);

        for x in bar.x..bar.x + bar.width {
            let style = if x < bar.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, bar.y)].set_style(style);
        }

        let label_x = bar.x + (bar.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, bar.y, &label, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_clamped() {
        let theme = Theme::default();
        assert_eq!(ProgressBar::new("x", 1.7, &theme).ratio, 1.0);
        assert_eq!(ProgressBar::new("x", -0.2, &theme).ratio, 0.0);
        assert!((ProgressBar::percent("x", 60, &theme).ratio - 0.6).abs() < 1e-9);
    }

    #[test]
    fn inline_bar_fills_proportionally() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::percent("label", 50, &theme)
            .color(Color::Green)
            .inline(10)
            .render(area, &mut buf);
        // Bar spans columns 10..30; the first half is filled.
        assert_eq!(buf[(10, 0)].bg, Color::Green);
        assert_eq!(buf[(19, 0)].bg, Color::Green);
        assert_ne!(buf[(20, 0)].bg, Color::Green);
    }
}
