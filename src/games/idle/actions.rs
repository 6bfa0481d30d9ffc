//! Semantic action IDs for Idle Factories click targets.

// ── Factory purchase (base + factory ordinal 0..6) ──────────────
pub const BUY_FACTORY_BASE: u16 = 100;

// ── Reset flow ──────────────────────────────────────────────────
pub const RESET_REQUEST: u16 = 500;
pub const RESET_CONFIRM: u16 = 501;
pub const RESET_CANCEL: u16 = 502;
