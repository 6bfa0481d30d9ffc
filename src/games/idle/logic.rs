//! Idle Factories game logic — pure functions over [`SimulationState`].

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::SimError;
use super::state::{FactoryKind, SimulationState};

/// Advance production to `now_ms`.
///
/// Every owned factory contributes `elapsed_ms * rate * count / 1000`.
/// Returns the number of owned entries that produced.
pub fn tick(state: &mut SimulationState, now_ms: f64) -> usize {
    let elapsed = match credited_ms(state.last_tick_ms, now_ms) {
        Some(ms) => {
            // The sub-microsecond remainder stays on the clock for the next tick.
            state.last_tick_ms += ms.to_f64().unwrap_or(now_ms - state.last_tick_ms);
            ms
        }
        None => {
            state.last_tick_ms = now_ms;
            Decimal::ZERO
        }
    };

    let gains: Vec<Decimal> = state
        .owned
        .iter()
        .map(|(kind, &count)| {
            elapsed
                .saturating_mul(kind.base_rate())
                .saturating_mul(Decimal::from(count))
                / Decimal::ONE_THOUSAND
        })
        .collect();
    for gain in &gains {
        add_score(state, *gain);
    }
    gains.len()
}

/// Milliseconds between two timestamps as a decimal, truncated to whole
/// microseconds. `None` when the clock moved backwards or the delta is not
/// a finite number.
fn credited_ms(last_ms: f64, now_ms: f64) -> Option<Decimal> {
    let delta = now_ms - last_ms;
    if !(delta >= 0.0) {
        return None;
    }
    Decimal::from_f64(delta).map(|d| d.round_dp_with_strategy(3, RoundingStrategy::ToZero))
}

/// Add `amount` to the score and raise the high-water mark if needed.
/// Negative amounts are not rejected.
pub fn add_score(state: &mut SimulationState, amount: Decimal) {
    state.score = state.score.saturating_add(amount);
    if state.score > state.max_score {
        state.max_score = state.score;
    }
}

/// Buy one factory without checking funds. The score may go negative;
/// callers gate on [`SimulationState::can_afford`].
pub fn purchase(state: &mut SimulationState, kind: FactoryKind) {
    state.score = state.score.saturating_sub(kind.price());
    let count = state.owned.entry(kind).or_insert(0);
    *count = count.saturating_add(1);
}

/// Buy one factory only if the score covers its price.
pub fn try_purchase(state: &mut SimulationState, kind: FactoryKind) -> Result<(), SimError> {
    if !state.can_afford(kind) {
        return Err(SimError::Unaffordable {
            kind,
            price: kind.price(),
            score: state.score,
        });
    }
    purchase(state, kind);
    Ok(())
}

/// Wipe score, best score and every owned factory.
pub fn reset(state: &mut SimulationState) {
    state.score = Decimal::ZERO;
    state.max_score = Decimal::ZERO;
    state.owned.clear();
}

/// Format a score with thousands separators and at most one
/// (truncated) decimal digit, e.g. `1,234.5`.
pub fn format_number(n: Decimal) -> String {
    if n.is_sign_negative() {
        let shown = format_number(-n);
        return if shown == "0" { shown } else { format!("-{shown}") };
    }
    let int_part = n.trunc();
    let tenths = ((n - int_part) * Decimal::TEN).trunc();

    let s = int_part.normalize().to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if tenths.is_zero() {
        result
    } else {
        format!("{}.{}", result, tenths.normalize())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // ── Strategy helpers ──────────────────────────────────

    fn arb_kind() -> impl Strategy<Value = FactoryKind> {
        (0usize..7).prop_map(|i| FactoryKind::all()[i])
    }

    #[derive(Clone, Debug)]
    enum Command {
        Tick(u32),
        AddScore(i64),
        Purchase(FactoryKind),
        Reset,
    }

    fn arb_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            4 => (0u32..5_000).prop_map(Command::Tick),
            2 => (-1_000_000i64..1_000_000).prop_map(Command::AddScore),
            3 => arb_kind().prop_map(Command::Purchase),
            1 => Just(Command::Reset),
        ]
    }

    fn apply(state: &mut SimulationState, now: &mut f64, cmd: &Command) {
        match cmd {
            Command::Tick(ms) => {
                *now += *ms as f64;
                tick(state, *now);
            }
            Command::AddScore(n) => add_score(state, Decimal::from(*n)),
            Command::Purchase(kind) => purchase(state, *kind),
            Command::Reset => reset(state),
        }
    }

    // ── Invariants ────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_max_score_never_below_score(
            start in 0i64..100_000,
            cmds in prop::collection::vec(arb_command(), 0..60),
        ) {
            let mut state = SimulationState::new(Decimal::from(start), 0.0);
            let mut now = 0.0;
            for cmd in &cmds {
                apply(&mut state, &mut now, cmd);
                prop_assert!(state.max_score >= state.score, "after {:?}", cmd);
            }
        }

        #[test]
        fn prop_owned_never_stores_zero(
            cmds in prop::collection::vec(arb_command(), 0..60),
        ) {
            let mut state = SimulationState::new(Decimal::from(10_000), 0.0);
            let mut now = 0.0;
            for cmd in &cmds {
                apply(&mut state, &mut now, cmd);
                prop_assert!(state.owned.values().all(|&n| n > 0));
            }
        }

        #[test]
        fn prop_purchase_arithmetic(kind in arb_kind(), start in -1_000_000i64..10_000_000, prior in 0u32..50) {
            let mut state = SimulationState::new(Decimal::from(start), 0.0);
            if prior > 0 {
                state.owned.insert(kind, prior);
            }
            purchase(&mut state, kind);
            prop_assert_eq!(state.score, Decimal::from(start) - kind.price());
            prop_assert_eq!(state.number_owned(kind), Some(prior + 1));
        }

        #[test]
        fn prop_tick_is_sum_of_contributions(
            elapsed in 0u32..100_000,
            a in arb_kind(), ca in 1u32..100,
            b in arb_kind(), cb in 1u32..100,
        ) {
            prop_assume!(a != b);
            let mut state = SimulationState::new(Decimal::ZERO, 0.0);
            state.owned.insert(a, ca);
            state.owned.insert(b, cb);
            tick(&mut state, elapsed as f64);
            let t = Decimal::from(elapsed);
            let expected = t * a.base_rate() * Decimal::from(ca) / Decimal::ONE_THOUSAND
                + t * b.base_rate() * Decimal::from(cb) / Decimal::ONE_THOUSAND;
            prop_assert_eq!(state.score, expected);
        }

        #[test]
        fn prop_can_afford_matches_comparison(kind in arb_kind(), cents in -100_000i64..200_000_000) {
            let state = SimulationState::new(Decimal::new(cents, 2), 0.0);
            prop_assert_eq!(state.can_afford(kind), Decimal::new(cents, 2) >= kind.price());
        }
    }

    // ── format_number properties ──────────────────────────

    proptest! {
        #[test]
        fn prop_format_number_commas_at_correct_positions(int_val in 0u64..1_000_000_000_000) {
            let s = format_number(Decimal::from(int_val));
            let stripped: String = s.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, int_val.to_string());
        }

        #[test]
        fn prop_format_number_negative_has_minus(n in 1i64..1_000_000_000) {
            let s = format_number(Decimal::new(-n, 1));
            prop_assert!(s.starts_with('-'), "got: {}", s);
        }
    }
}
