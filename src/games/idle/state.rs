//! Idle Factories state definitions.

use std::collections::BTreeMap;

use ratzilla::ratatui::style::Color;
use rust_decimal::Decimal;

/// Kinds of factories, in purchase-list order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactoryKind {
    Workshop,
    Mill,
    Foundry,
    Refinery,
    AssemblyLine,
    Megaplant,
    Gigafactory,
}

impl FactoryKind {
    /// All factory kinds in display order.
    pub fn all() -> &'static [FactoryKind] {
        &[
            FactoryKind::Workshop,
            FactoryKind::Mill,
            FactoryKind::Foundry,
            FactoryKind::Refinery,
            FactoryKind::AssemblyLine,
            FactoryKind::Megaplant,
            FactoryKind::Gigafactory,
        ]
    }

    /// Look up a kind by its position in [`FactoryKind::all`].
    pub fn from_ordinal(ordinal: usize) -> Option<FactoryKind> {
        Self::all().get(ordinal).copied()
    }

    pub fn ordinal(self) -> u32 {
        match self {
            FactoryKind::Workshop => 0,
            FactoryKind::Mill => 1,
            FactoryKind::Foundry => 2,
            FactoryKind::Refinery => 3,
            FactoryKind::AssemblyLine => 4,
            FactoryKind::Megaplant => 5,
            FactoryKind::Gigafactory => 6,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FactoryKind::Workshop => "Workshop",
            FactoryKind::Mill => "Mill",
            FactoryKind::Foundry => "Foundry",
            FactoryKind::Refinery => "Refinery",
            FactoryKind::AssemblyLine => "Assembly Line",
            FactoryKind::Megaplant => "Megaplant",
            FactoryKind::Gigafactory => "Gigafactory",
        }
    }

    pub fn color(self) -> Color {
        match self {
            FactoryKind::Workshop => Color::Green,
            FactoryKind::Mill => Color::Cyan,
            FactoryKind::Foundry => Color::Yellow,
            FactoryKind::Refinery => Color::Magenta,
            FactoryKind::AssemblyLine => Color::Blue,
            FactoryKind::Megaplant => Color::Red,
            FactoryKind::Gigafactory => Color::White,
        }
    }

    /// Score per second produced by one unit: 1 for the first kind,
    /// then 7^(ordinal - 1).
    pub fn base_rate(self) -> Decimal {
        match self.ordinal() {
            0 => Decimal::ONE,
            n => Decimal::from(7_i64.pow(n - 1)),
        }
    }

    /// Price of one unit: 10^ordinal. Prices do not grow with ownership.
    pub fn price(self) -> Decimal {
        Decimal::from(10_i64.pow(self.ordinal()))
    }

    /// Key to buy (1-7 mapped to factory index).
    pub fn key(self) -> char {
        char::from(b'1' + self.ordinal() as u8)
    }
}

/// Full state of an idle-factories run.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Current spendable score.
    pub score: Decimal,
    /// Highest value `score` has reached. Gates which factories are shown.
    pub max_score: Decimal,
    /// Owned counts. A kind that was never bought has no entry.
    pub owned: BTreeMap<FactoryKind, u32>,
    /// Timestamp (ms) of the previous tick.
    pub last_tick_ms: f64,
}

impl SimulationState {
    pub fn new(starting_score: Decimal, now_ms: f64) -> Self {
        Self {
            score: starting_score,
            max_score: starting_score,
            owned: BTreeMap::new(),
            last_tick_ms: now_ms,
        }
    }

    pub fn can_afford(&self, kind: FactoryKind) -> bool {
        self.score >= kind.price()
    }

    pub fn owns_any(&self, kind: FactoryKind) -> bool {
        self.owned.get(&kind).is_some_and(|&n| n > 0)
    }

    /// Owned count, or `None` if the kind was never purchased.
    pub fn number_owned(&self, kind: FactoryKind) -> Option<u32> {
        self.owned.get(&kind).copied()
    }

    /// Whether the factory belongs in the purchase list: already owned,
    /// within reach of the best score so far (price below twice of it), or
    /// the first kind, which is always listed.
    pub fn should_show(&self, kind: FactoryKind) -> bool {
        self.owns_any(kind)
            || kind.price() < self.max_score.saturating_mul(Decimal::TWO)
            || kind.ordinal() == 0
    }

    /// Score per second from all owned factories.
    pub fn production_per_sec(&self) -> Decimal {
        self.owned.iter().fold(Decimal::ZERO, |acc, (kind, &count)| {
            acc.saturating_add(kind.base_rate().saturating_mul(Decimal::from(count)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(score: i64) -> SimulationState {
        SimulationState::new(Decimal::from(score), 0.0)
    }

    #[test]
    fn seven_kinds_in_ordinal_order() {
        let all = FactoryKind::all();
        assert_eq!(all.len(), 7);
        for (i, kind) in all.iter().enumerate() {
            assert_eq!(kind.ordinal() as usize, i);
            assert_eq!(FactoryKind::from_ordinal(i), Some(*kind));
        }
        assert_eq!(FactoryKind::from_ordinal(7), None);
    }

    #[test]
    fn prices_are_powers_of_ten() {
        assert_eq!(FactoryKind::Workshop.price(), Decimal::from(1));
        assert_eq!(FactoryKind::Mill.price(), Decimal::from(10));
        assert_eq!(FactoryKind::Foundry.price(), Decimal::from(100));
        assert_eq!(FactoryKind::Gigafactory.price(), Decimal::from(1_000_000));
    }

    #[test]
    fn rates_are_powers_of_seven_after_first() {
        assert_eq!(FactoryKind::Workshop.base_rate(), Decimal::ONE);
        assert_eq!(FactoryKind::Mill.base_rate(), Decimal::ONE);
        assert_eq!(FactoryKind::Foundry.base_rate(), Decimal::from(7));
        assert_eq!(FactoryKind::Refinery.base_rate(), Decimal::from(49));
        assert_eq!(FactoryKind::Gigafactory.base_rate(), Decimal::from(16_807));
    }

    #[test]
    fn keys_are_one_through_seven() {
        let keys: String = FactoryKind::all().iter().map(|k| k.key()).collect();
        assert_eq!(keys, "1234567");
    }

    #[test]
    fn new_state_starts_with_max_equal_to_score() {
        let state = state_with(10_000);
        assert_eq!(state.score, Decimal::from(10_000));
        assert_eq!(state.max_score, state.score);
        assert!(state.owned.is_empty());
    }

    #[test]
    fn can_afford_boundary() {
        let mut state = state_with(0);
        state.score = Decimal::new(9999, 2); // 99.99
        assert!(!state.can_afford(FactoryKind::Foundry));
        state.score = Decimal::from(100);
        assert!(state.can_afford(FactoryKind::Foundry));
    }

    #[test]
    fn number_owned_absent_until_bought() {
        let mut state = state_with(0);
        assert_eq!(state.number_owned(FactoryKind::Mill), None);
        assert!(!state.owns_any(FactoryKind::Mill));
        state.owned.insert(FactoryKind::Mill, 2);
        assert_eq!(state.number_owned(FactoryKind::Mill), Some(2));
        assert!(state.owns_any(FactoryKind::Mill));
    }

    #[test]
    fn should_show_hides_far_away_factories() {
        let mut state = state_with(0);
        state.max_score = Decimal::from(40);
        // 100 >= 40 * 2
        assert!(!state.should_show(FactoryKind::Foundry));
        // 10 < 80
        assert!(state.should_show(FactoryKind::Mill));
    }

    #[test]
    fn should_show_first_kind_always() {
        let state = state_with(0);
        assert!(state.should_show(FactoryKind::Workshop));
        assert!(!state.should_show(FactoryKind::Mill));
    }

    #[test]
    fn should_show_owned_even_when_poor() {
        let mut state = state_with(0);
        state.owned.insert(FactoryKind::Gigafactory, 1);
        assert!(state.should_show(FactoryKind::Gigafactory));
    }

    #[test]
    fn should_show_uses_max_not_current_score() {
        let mut state = state_with(10_000);
        state.score = Decimal::ZERO;
        // 10_000 < 20_000
        assert!(state.should_show(FactoryKind::AssemblyLine));
        assert!(!state.should_show(FactoryKind::Megaplant));
    }

    #[test]
    fn production_sums_rate_times_count() {
        let mut state = state_with(0);
        state.owned.insert(FactoryKind::Workshop, 3);
        state.owned.insert(FactoryKind::Foundry, 2);
        assert_eq!(state.production_per_sec(), Decimal::from(3 + 14));
    }
}
