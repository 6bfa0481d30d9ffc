mod games;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::idle::config::SimConfig;
use games::idle::logic::format_number;
use games::idle::sim::Change;
use games::idle::IdleGame;
use games::Game;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// `<body>` attribute holding an optional JSON [`SimConfig`].
const CONFIG_ATTRIBUTE: &str = "data-idle-config";

fn log_info(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

fn log_warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

/// Milliseconds from `performance.now()`, falling back to the wall clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Read the config from the page. A missing attribute means defaults; a bad
/// one is reported and replaced by defaults.
fn load_config() -> SimConfig {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector("body").ok().flatten())
        .and_then(|body| body.get_attribute(CONFIG_ATTRIBUTE));

    match raw {
        None => SimConfig::default(),
        Some(json) => match SimConfig::from_json(&json) {
            Ok(config) => {
                log_info(&format!("Idle Factories: config loaded: {config:?}"));
                config
            }
            Err(e) => {
                log_warn(&format!("Idle Factories: ignoring {CONFIG_ATTRIBUTE}: {e}"));
                SimConfig::default()
            }
        },
    }
}

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let start = now_ms();
    let mut game = IdleGame::new(load_config(), start);
    game.sim.subscribe(|change, state| match change {
        Change::Purchased(kind) => log_info(&format!(
            "Idle Factories: bought {} (owned {}, score {})",
            kind.name(),
            state.number_owned(*kind).unwrap_or(0),
            format_number(state.score)
        )),
        Change::Reset => log_info("Idle Factories: reset"),
        Change::Ticked { .. } | Change::ScoreAdded(_) => {}
    });
    if let Err(e) = game.start(start) {
        log_warn(&format!("Idle Factories: could not start: {e}"));
    }

    let game = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action_id) = action {
                game.borrow_mut()
                    .handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c.to_ascii_lowercase()),
                KeyCode::Esc => InputEvent::Key('n'),
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let mut game = game.borrow_mut();
            game.tick(now_ms());

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            game.render(f, size, &click_state);
        }
    });

    Ok(())
}
