use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a long position was closed.
///
/// Variants are listed in the order the simulator checks them on every bar while in a
/// position; `None` means no exit rule fired and the position stays open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitKind {
    StopLoss,
    TakeProfit,
    SignalExit,
    None,
}

impl ExitKind {
    pub fn is_exit(&self) -> bool {
        !matches!(self, ExitKind::None)
    }
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitKind::StopLoss => "STOP_LOSS",
            ExitKind::TakeProfit => "TAKE_PROFIT",
            ExitKind::SignalExit => "SIGNAL_EXIT",
            ExitKind::None => "NONE",
        };
        f.write_str(s)
    }
}

/// One completed round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: String,
    pub bar: usize,
    pub exit_kind: ExitKind,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_pct: f64,
}

/// Summary statistics of a completed backtest.
///
/// `total_return` and `max_drawdown` are fractions (`-0.25` is a 25% drawdown).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub final_balance: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub trades: usize,
    pub sharpe: f64,
}

impl BacktestSummary {
    pub fn total_return_pct(&self) -> f64 {
        self.total_return * 100.0
    }

    pub fn max_drawdown_pct(&self) -> f64 {
        self.max_drawdown * 100.0
    }

    pub fn report(&self) -> BacktestReport {
        BacktestReport {
            final_balance: self.final_balance,
            total_return_pct: self.total_return_pct(),
            max_drawdown_pct: self.max_drawdown_pct(),
            trades: self.trades,
            sharpe: self.sharpe,
        }
    }
}

/// Human-facing audit record, keyed the way reports are read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    #[serde(rename = "Final Balance")]
    pub final_balance: f64,
    #[serde(rename = "Total Return %")]
    pub total_return_pct: f64,
    #[serde(rename = "Max Drawdown %")]
    pub max_drawdown_pct: f64,
    #[serde(rename = "Trades")]
    pub trades: usize,
    #[serde(rename = "Sharpe")]
    pub sharpe: f64,
}

impl fmt::Display for BacktestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Balance:  {:.2}", self.final_balance)?;
        writeln!(f, "Total Return:   {:.2}%", self.total_return_pct)?;
        writeln!(f, "Max Drawdown:   {:.2}%", self.max_drawdown_pct)?;
        writeln!(f, "Total Trades:   {}", self.trades)?;
        write!(f, "Sharpe Ratio:   {:.4}", self.sharpe)
    }
}
