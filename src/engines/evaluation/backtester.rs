use crate::{
    config::SimulationConfig,
    data::FeatureSeries,
    engines::evaluation::{position::Position, signals::raw_scores},
    engines::generation::genome::Genome,
    engines::metrics::MetricsEngine,
    types::{BacktestReport, BacktestSummary, ExitKind, TradeRecord},
};

/// Full output of a usable backtest.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    /// Account value per bar, aligned with the feature series.
    pub equity_curve: Vec<f64>,
    pub trades: Vec<TradeRecord>,
    pub summary: BacktestSummary,
}

/// Either a result or the rejection sentinel for runs with too few completed trades.
#[derive(Debug, Clone, PartialEq)]
pub enum BacktestOutcome {
    Completed(BacktestResult),
    Rejected { trades: usize },
}

impl BacktestOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, BacktestOutcome::Rejected { .. })
    }

    pub fn summary(&self) -> Option<&BacktestSummary> {
        match self {
            BacktestOutcome::Completed(result) => Some(&result.summary),
            BacktestOutcome::Rejected { .. } => None,
        }
    }

    /// Detailed report mode: the structured summary, or `None` when rejected.
    pub fn report(&self) -> Option<BacktestReport> {
        self.summary().map(BacktestSummary::report)
    }
}

/// Bar-by-bar long-only simulator for one genome on one asset.
///
/// Pure function of its inputs: the same series and genome always yield the same
/// outcome.
pub struct Backtester {
    config: SimulationConfig,
    metrics: MetricsEngine,
}

impl Backtester {
    pub fn new(config: SimulationConfig) -> Self {
        let metrics = MetricsEngine::new(config.initial_balance, config.periods_per_year);
        Self { config, metrics }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(&self, series: &FeatureSeries, genome: &Genome) -> BacktestOutcome {
        let scores = raw_scores(series, genome, self.config.volatility_threshold);

        let mut balance = self.config.initial_balance;
        let mut position: Option<Position> = None;
        let mut equity_curve = Vec::with_capacity(series.len());
        let mut trades = Vec::new();

        for (i, (bar, score)) in series.bars().iter().zip(scores).enumerate() {
            let regime_sma = match bar.sma_regime {
                Some(sma) => sma,
                None => {
                    equity_curve.push(balance);
                    continue;
                }
            };
            let close = bar.close;

            match position {
                Some(pos) => {
                    let exit = pos.check_exit(close, score, genome.sell_thresh);
                    if exit.is_exit() {
                        let fill = pos.fill_price(exit, close);
                        balance *= fill / pos.entry_price;
                        trades.push(TradeRecord {
                            timestamp: bar.timestamp.clone(),
                            bar: i,
                            exit_kind: exit,
                            entry_price: pos.entry_price,
                            exit_price: fill,
                            pnl_pct: (fill / pos.entry_price - 1.0) * 100.0,
                        });
                        position = None;
                    }
                }
                None => {
                    if let (Some(score), Some(atr)) = (score, bar.atr) {
                        if self.entry_allowed(score, close, regime_sma, genome) {
                            position = Some(Position::open(i, close, atr, genome));
                        }
                    }
                }
            }

            let equity = match &position {
                Some(pos) => pos.mark_to_market(balance, close),
                None => balance,
            };
            equity_curve.push(equity);
        }

        if trades.len() < self.config.min_trades {
            log::trace!(
                "{}: rejected genome with {} trades ({} required)",
                series.asset(),
                trades.len(),
                self.config.min_trades
            );
            return BacktestOutcome::Rejected {
                trades: trades.len(),
            };
        }

        let summary = self.metrics.summarize(&equity_curve, trades.len());
        BacktestOutcome::Completed(BacktestResult {
            equity_curve,
            trades,
            summary,
        })
    }

    /// Entry needs `score > buy_thresh`; at or below the regime average it must also reach
    /// `regime_override`.
    fn entry_allowed(&self, score: f64, close: f64, regime_sma: f64, genome: &Genome) -> bool {
        if score <= genome.buy_thresh {
            return false;
        }
        let bull_regime = close > regime_sma;
        bull_regime || score >= self.config.regime_override
    }

    /// Detailed report mode.
    pub fn report(&self, series: &FeatureSeries, genome: &Genome) -> Option<BacktestReport> {
        self.run(series, genome).report()
    }
}
