//! Clickable UI building blocks.
//!
//! [`ClickableList`] keeps rendered lines and their click actions together,
//! so a target always lands on the row its text was drawn on.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;
use ratzilla::ratatui::widgets::{Paragraph, Wrap};

use crate::input::ClickState;

/// Lines to render, some of which are bound to action IDs.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Score: 10,000"));
/// cl.push_clickable(Line::from("[1] Workshop"), BUY_FACTORY_BASE);
/// cl.register_targets(area, &mut cs, 1, 1, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line bound to `action_id`. The binding follows the line if
    /// lines are added before it.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rows the lines take once wrapped to `width` columns.
    pub fn visual_height(&self, width: u16) -> u16 {
        if width == 0 {
            return self.lines.len() as u16;
        }
        let paragraph = Paragraph::new(self.lines.clone()).wrap(Wrap { trim: false });
        paragraph.line_count(width) as u16
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for every clickable line.
    ///
    /// * `top_offset` / `bottom_offset` — rows taken by borders.
    /// * `scroll` — rows scrolled out at the top.
    ///
    /// Each logical line is assumed to occupy one row; callers rendering
    /// with `Wrap` should keep clickable lines short.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        for &(line_idx, action_id) in &self.actions {
            if line_idx < scroll {
                continue;
            }
            let row = content_y + (line_idx - scroll);
            if row >= content_end {
                continue;
            }
            cs.add_row_target(area, row, action_id);
        }
    }
}
