//! Idle Factories rendering: score header, factory list, reset bar, log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::logic::format_number;
use super::state::FactoryKind;
use super::IdleGame;

pub fn render(game: &IdleGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    // Log goes to the right on wide screens, below everything on narrow ones.
    let (main_area, log_area) = if is_narrow_layout(area.width) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(6)])
            .split(area);
        (chunks[0], chunks[1])
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        (chunks[0], chunks[1])
    };

    let reset_list = reset_bar(game);
    let reset_height = reset_list.visual_height(main_area.width.saturating_sub(2)) + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(reset_height),
        ])
        .split(main_area);

    render_header(game, f, chunks[0]);
    render_factories(game, f, chunks[1], click_state);
    render_reset(game, reset_list, f, chunks[2], click_state);
    render_log(game, f, log_area);
}

fn render_header(game: &IdleGame, f: &mut Frame, area: Rect) {
    let state = game.sim.state();
    let per_sec = state.production_per_sec();

    let score_style = if state.score.is_sign_negative() && !state.score.is_zero() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Score ", Style::default().fg(Color::Gray)),
            Span::styled(format_number(state.score), score_style),
        ]),
        Line::from(vec![
            Span::styled(" Best  ", Style::default().fg(Color::Gray)),
            Span::styled(format_number(state.max_score), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled(" Rate  ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("+{} /s", format_number(per_sec)),
                Style::default().fg(if per_sec.is_zero() { Color::DarkGray } else { Color::Green }),
            ),
        ]),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Idle Factories "),
    );
    f.render_widget(widget, area);
}

fn render_factories(
    game: &IdleGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = game.sim.state();
    let mut cl = ClickableList::new();
    let mut hidden = 0;

    for &kind in FactoryKind::all() {
        if !state.should_show(kind) {
            hidden += 1;
            continue;
        }
        let affordable = state.can_afford(kind);
        // Never-bought factories show an empty count column.
        let owned = state
            .number_owned(kind)
            .map(|n| format!("x{n}"))
            .unwrap_or_default();

        let key_style = if affordable {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let name_style = if affordable {
            Style::default().fg(kind.color())
        } else {
            Style::default().fg(kind.color()).add_modifier(Modifier::DIM)
        };
        let price_style = if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let line = Line::from(vec![
            Span::styled(format!(" [{}] ", kind.key()), key_style),
            Span::styled(format!("{:<14}", kind.name()), name_style),
            Span::styled(format!("{owned:>6} "), Style::default().fg(Color::Green)),
            Span::styled(format_number(kind.price()), price_style),
        ]);
        cl.push_clickable(line, BUY_FACTORY_BASE + kind.ordinal() as u16);
    }

    if hidden > 0 {
        cl.push(Line::from(Span::styled(
            format!("  … {hidden} more to discover"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Factories (tap to buy) "),
    );
    f.render_widget(widget, area);
}

/// The reset bar: one trigger, or confirm/cancel while a reset is pending.
fn reset_bar(game: &IdleGame) -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    if game.confirm_reset {
        cl.push_clickable(
            Line::from(Span::styled(
                " [Y] Yes, wipe everything",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            RESET_CONFIRM,
        );
        cl.push_clickable(
            Line::from(Span::styled(" [N] Keep playing", Style::default().fg(Color::White))),
            RESET_CANCEL,
        );
    } else {
        cl.push_clickable(
            Line::from(Span::styled(" [R] Reset", Style::default().fg(Color::DarkGray))),
            RESET_REQUEST,
        );
    }
    cl
}

fn render_reset(
    game: &IdleGame,
    cl: ClickableList<'static>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, 0);
    }

    let border_color = if game.confirm_reset { Color::Red } else { Color::DarkGray };
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    f.render_widget(widget, area);
}

fn render_log(game: &IdleGame, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;
    let log = game.log();

    // Newest first
    let lines: Vec<Line> = log
        .iter()
        .rev()
        .take(visible_height)
        .map(|entry| {
            let style = if entry.is_important {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.clone(), style))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
