/// Idle Factories — buy factories, watch the score climb.

pub mod actions;
pub mod config;
pub mod error;
pub mod logic;
pub mod render;
pub mod sim;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::time::TickDriver;

use actions::*;
use config::SimConfig;
use error::SimError;
use logic::format_number;
use sim::{Change, Simulation};
use state::FactoryKind;

/// Maximum entries kept in the event log panel.
const LOG_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// The view: owns the simulation and the timer that drives it. Dropping
/// the game disposes the simulation.
pub struct IdleGame {
    pub sim: Simulation,
    driver: TickDriver,
    log: Rc<RefCell<Vec<LogEntry>>>,
    /// Reset was requested and awaits confirmation.
    pub confirm_reset: bool,
}

impl IdleGame {
    pub fn new(config: SimConfig, now_ms: f64) -> Self {
        let mut sim = Simulation::new(config, now_ms);
        let driver = TickDriver::new(sim.config().tick_interval_ms);
        let log = Rc::new(RefCell::new(vec![LogEntry {
            text: "Welcome to Idle Factories!".into(),
            is_important: true,
        }]));

        sim.subscribe({
            let log = log.clone();
            move |change, state| {
                let entry = match change {
                    Change::Purchased(kind) => LogEntry {
                        text: format!(
                            "Bought {} ({} owned)",
                            kind.name(),
                            state.number_owned(*kind).unwrap_or(0)
                        ),
                        is_important: false,
                    },
                    Change::Reset => LogEntry {
                        text: "Everything was reset.".into(),
                        is_important: true,
                    },
                    Change::Ticked { .. } | Change::ScoreAdded(_) => return,
                };
                push_log(&mut log.borrow_mut(), entry);
            }
        });

        Self {
            sim,
            driver,
            log,
            confirm_reset: false,
        }
    }

    /// Start production and the timer.
    pub fn start(&mut self, now_ms: f64) -> Result<(), SimError> {
        self.sim.start(now_ms)?;
        self.driver.start(now_ms);
        Ok(())
    }

    /// Pause production and the timer.
    pub fn stop(&mut self) {
        self.driver.stop();
        self.sim.stop();
    }

    pub fn log(&self) -> std::cell::Ref<'_, Vec<LogEntry>> {
        self.log.borrow()
    }

    fn add_log(&self, text: String, is_important: bool) {
        push_log(&mut self.log.borrow_mut(), LogEntry { text, is_important });
    }

    /// Buy through the UI gate: the factory must be listed and affordable.
    fn buy(&mut self, kind: FactoryKind) -> bool {
        if !self.sim.should_show(kind) || !self.sim.can_afford(kind) {
            return false;
        }
        if let Err(e) = self.sim.purchase(kind) {
            self.add_log(e.to_string(), false);
            return false;
        }
        true
    }

    fn reset_confirmed(&mut self) {
        self.confirm_reset = false;
        self.sim.reset();
    }

    fn request_reset(&mut self) {
        self.confirm_reset = true;
        self.add_log(
            format!(
                "Reset will discard {} points. Press [Y] to confirm.",
                format_number(self.sim.score())
            ),
            true,
        );
    }

    fn handle_key(&mut self, key: char) -> bool {
        if self.confirm_reset {
            return match key {
                'y' | 'r' => {
                    self.reset_confirmed();
                    true
                }
                'n' => {
                    self.confirm_reset = false;
                    true
                }
                _ => false,
            };
        }
        match key {
            '1'..='7' => {
                let ordinal = (key as u8 - b'1') as usize;
                match FactoryKind::from_ordinal(ordinal) {
                    Some(kind) => self.buy(kind),
                    None => false,
                }
            }
            'r' => {
                self.request_reset();
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            RESET_REQUEST => {
                self.request_reset();
                true
            }
            RESET_CONFIRM if self.confirm_reset => {
                self.reset_confirmed();
                true
            }
            RESET_CANCEL => {
                self.confirm_reset = false;
                true
            }
            id if id >= BUY_FACTORY_BASE => {
                self.confirm_reset = false;
                match FactoryKind::from_ordinal((id - BUY_FACTORY_BASE) as usize) {
                    Some(kind) => self.buy(kind),
                    None => false,
                }
            }
            _ => false,
        }
    }
}

fn push_log(log: &mut Vec<LogEntry>, entry: LogEntry) {
    log.push(entry);
    if log.len() > LOG_CAPACITY {
        log.remove(0);
    }
}

impl Game for IdleGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn tick(&mut self, now_ms: f64) {
        if self.driver.poll(now_ms) {
            self.sim.tick(now_ms);
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

impl Drop for IdleGame {
    fn drop(&mut self) {
        self.driver.stop();
        self.sim.dispose();
    }
}
