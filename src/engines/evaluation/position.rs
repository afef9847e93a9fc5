use crate::engines::generation::genome::Genome;
use crate::types::ExitKind;

/// Exit rules in the order they are checked each bar; the first one that fires wins.
pub const EXIT_PRIORITY: [ExitKind; 3] = [ExitKind::StopLoss, ExitKind::TakeProfit, ExitKind::SignalExit];

/// Open long position. Only exists between an entry and the next exit.
///
/// Fills at the stop and target are assumed to happen exactly at those prices: there is
/// no slippage and no gap-through, even when the bar closes well beyond them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub entry_bar: usize,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target_price: f64,
}

impl Position {
    /// Place stop and target `atr` multiples away from the entry close. The stop never
    /// goes below zero.
    pub fn open(bar: usize, close: f64, atr: f64, genome: &Genome) -> Self {
        Self {
            entry_bar: bar,
            entry_price: close,
            stop_price: (close - atr * genome.sl_multiplier).max(0.0),
            target_price: close + atr * genome.tp_multiplier,
        }
    }

    fn triggers(&self, rule: ExitKind, close: f64, raw_score: Option<f64>, sell_thresh: f64) -> bool {
        match rule {
            ExitKind::StopLoss => close <= self.stop_price,
            ExitKind::TakeProfit => close >= self.target_price,
            ExitKind::SignalExit => raw_score.map_or(false, |s| s < -sell_thresh),
            ExitKind::None => false,
        }
    }

    /// First rule of [`EXIT_PRIORITY`] that fires on this bar, or `ExitKind::None`.
    pub fn check_exit(&self, close: f64, raw_score: Option<f64>, sell_thresh: f64) -> ExitKind {
        EXIT_PRIORITY
            .iter()
            .copied()
            .find(|&rule| self.triggers(rule, close, raw_score, sell_thresh))
            .unwrap_or(ExitKind::None)
    }

    pub fn fill_price(&self, exit: ExitKind, close: f64) -> f64 {
        match exit {
            ExitKind::StopLoss => self.stop_price,
            ExitKind::TakeProfit => self.target_price,
            ExitKind::SignalExit | ExitKind::None => close,
        }
    }

    pub fn mark_to_market(&self, balance: f64, close: f64) -> f64 {
        balance * (close / self.entry_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> Position {
        let genome = Genome {
            sl_multiplier: 1.0,
            tp_multiplier: 2.0,
            ..Default::default()
        };
        Position::open(0, 100.0, 10.0, &genome)
    }

    #[test]
    fn test_open_places_stop_and_target() {
        let pos = position();
        assert_eq!(pos.stop_price, 90.0);
        assert_eq!(pos.target_price, 120.0);
    }

    #[test]
    fn test_stop_beats_signal() {
        let pos = position();
        assert_eq!(pos.check_exit(85.0, Some(-5.0), 0.2), ExitKind::StopLoss);
        assert_eq!(pos.fill_price(ExitKind::StopLoss, 85.0), 90.0);
    }

    #[test]
    fn test_target_beats_signal() {
        let pos = position();
        assert_eq!(pos.check_exit(150.0, Some(-5.0), 0.2), ExitKind::TakeProfit);
        assert_eq!(pos.fill_price(ExitKind::TakeProfit, 150.0), 120.0);
    }

    #[test]
    fn test_signal_exit_fills_at_close() {
        let pos = position();
        assert_eq!(pos.check_exit(101.0, Some(-0.3), 0.2), ExitKind::SignalExit);
        assert_eq!(pos.fill_price(ExitKind::SignalExit, 101.0), 101.0);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let pos = position();
        assert_eq!(pos.check_exit(90.0, None, 0.2), ExitKind::StopLoss);
        assert_eq!(pos.check_exit(120.0, None, 0.2), ExitKind::TakeProfit);
        assert_eq!(pos.check_exit(105.0, Some(-0.2), 0.2), ExitKind::None);
        assert_eq!(pos.check_exit(105.0, None, 0.2), ExitKind::None);
    }

    #[test]
    fn test_stop_clamped_at_zero() {
        let genome = Genome {
            sl_multiplier: 5.0,
            ..Default::default()
        };
        let pos = Position::open(0, 10.0, 4.0, &genome);
        assert_eq!(pos.stop_price, 0.0);
    }
}
