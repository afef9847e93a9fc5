use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regime_evolver::config::{GeneConfig, SimulationConfig};
use regime_evolver::data::FeatureSeries;
use regime_evolver::engines::evaluation::{BacktestOutcome, Backtester};
use regime_evolver::engines::generation::{random_genome, Genome};
use regime_evolver::types::ExitKind;

fn lenient() -> Backtester {
    Backtester::new(SimulationConfig {
        min_trades: 1,
        ..Default::default()
    })
}

fn completed(outcome: BacktestOutcome) -> regime_evolver::engines::evaluation::BacktestResult {
    match outcome {
        BacktestOutcome::Completed(result) => result,
        BacktestOutcome::Rejected { trades } => panic!("unexpected rejection with {} trades", trades),
    }
}

/// Steady uptrend that gaps up 50% at bar 200, with a calm constant volatility.
fn gap_up_series() -> FeatureSeries {
    let closes: Vec<f64> = (0..260)
        .map(|i| {
            let base = 100.0 * 1.001f64.powi(i);
            if i >= 200 {
                base * 1.5
            } else {
                base
            }
        })
        .collect();
    let timestamps = (0..closes.len()).map(|i| format!("2020-{:04}", i)).collect();
    let volatility = Some(vec![Some(0.02); closes.len()]);
    FeatureSeries::from_columns("GAP", timestamps, closes, volatility).unwrap()
}

#[test]
fn test_take_profit_fills_at_target() {
    let series = gap_up_series();
    let genome = Genome {
        w_trend: 0.5,
        w_mean_rev: 0.1,
        w_vol: 0.5,
        sl_multiplier: 1.0,
        tp_multiplier: 2.0,
        ..Default::default()
    };

    let result = completed(lenient().run(&series, &genome));

    let entry = series.closes()[199];
    let atr = entry * 0.02;
    let first = &result.trades[0];
    assert_eq!(first.bar, 200);
    assert_eq!(first.exit_kind, ExitKind::TakeProfit);
    assert_eq!(first.entry_price, entry);
    assert_eq!(first.exit_price, entry + atr * 2.0);
    assert_eq!(first.timestamp, "2020-0200");
}

#[test]
fn test_warmup_bars_hold_initial_balance() {
    let series = gap_up_series();
    let genome = Genome {
        w_mean_rev: 0.1,
        ..Default::default()
    };

    let result = completed(lenient().run(&series, &genome));

    assert_eq!(result.equity_curve.len(), series.len());
    assert!(result.equity_curve[..199].iter().all(|&e| e == 1000.0));
}

#[test]
fn test_no_reentry_on_exit_bar() {
    let series = gap_up_series();
    let genome = Genome {
        w_mean_rev: 0.1,
        sl_multiplier: 1.0,
        tp_multiplier: 2.0,
        ..Default::default()
    };

    let result = completed(lenient().run(&series, &genome));

    let first = &result.trades[0];
    assert_eq!(first.bar, 200);
    let realized = 1000.0 * (first.exit_price / first.entry_price);
    assert_eq!(result.equity_curve[200], realized);

    // next entry waits for the bar after the exit
    assert!(result.trades.len() >= 2);
    assert_eq!(result.trades[1].entry_price, series.closes()[201]);
}

#[test]
fn test_short_history_is_rejected_under_default_gate() {
    let closes: Vec<f64> = (0..250).map(|i| 100.0 + 10.0 * (i as f64 / 3.0).sin()).collect();
    let series = FeatureSeries::from_closes_indexed("SHORT", closes).unwrap();
    let backtester = Backtester::new(SimulationConfig::default());
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..20 {
        let genome = random_genome(&GeneConfig::default(), &mut rng);
        match backtester.run(&series, &genome) {
            BacktestOutcome::Rejected { trades } => assert!(trades < 40),
            BacktestOutcome::Completed(_) => panic!("40 trades cannot fit in 51 tradable bars"),
        }
        assert!(backtester.report(&series, &genome).is_none());
    }
}

#[test]
fn test_flat_market_without_signal_is_rejected() {
    let series = FeatureSeries::from_closes_indexed("FLAT", vec![100.0; 250]).unwrap();
    let genome = Genome::default();
    let backtester = Backtester::new(SimulationConfig::default());

    // trend -0.5, neutral RSI, calm volatility +0.5: score 0 never clears buy_thresh
    assert_eq!(backtester.run(&series, &genome), BacktestOutcome::Rejected { trades: 0 });
    assert!(backtester.report(&series, &genome).is_none());
}

#[test]
fn test_flat_equity_has_degenerate_sharpe() {
    let series = FeatureSeries::from_closes_indexed("FLAT", vec![100.0; 250]).unwrap();
    let genome = Genome {
        w_trend: 0.1,
        w_mean_rev: 0.5,
        w_vol: 0.9,
        ..Default::default()
    };

    let result = completed(lenient().run(&series, &genome));

    assert!(!result.trades.is_empty());
    assert_eq!(result.summary.sharpe, -1.0);
    assert_eq!(result.summary.total_return, 0.0);
    assert_eq!(result.summary.max_drawdown, 0.0);
    assert_eq!(result.summary.final_balance, 1000.0);
}

#[test]
fn test_same_inputs_same_outcome() {
    let closes: Vec<f64> = (0..500)
        .map(|i| 100.0 + 15.0 * (i as f64 / 11.0).sin() + 0.05 * i as f64)
        .collect();
    let series = FeatureSeries::from_closes_indexed("SINE", closes).unwrap();
    let genome = Genome {
        rsi_period: 7,
        buy_thresh: 0.1,
        sell_thresh: 0.1,
        ..Default::default()
    };
    let backtester = lenient();

    assert_eq!(backtester.run(&series, &genome), backtester.run(&series, &genome));
}

#[test]
fn test_equity_never_negative() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut close = 100.0;
    let closes: Vec<f64> = (0..600)
        .map(|_| {
            close *= rng.gen_range(-0.25f64..0.25).exp();
            close
        })
        .collect();
    let series = FeatureSeries::from_closes_indexed("WILD", closes).unwrap();
    let backtester = lenient();

    for _ in 0..50 {
        let genome = random_genome(&GeneConfig::default(), &mut rng);
        if let BacktestOutcome::Completed(result) = backtester.run(&series, &genome) {
            assert!(result.equity_curve.iter().all(|&e| e >= 0.0));
            assert!(result.summary.final_balance >= 0.0);
            assert!(result.summary.max_drawdown <= 0.0);
        }
    }
}

#[test]
fn test_report_uses_percentages() {
    let series = gap_up_series();
    let genome = Genome {
        w_mean_rev: 0.1,
        ..Default::default()
    };
    let backtester = lenient();

    let summary = completed(backtester.run(&series, &genome)).summary;
    let report = backtester.report(&series, &genome).unwrap();

    assert_eq!(report.trades, summary.trades);
    assert_eq!(report.total_return_pct, summary.total_return * 100.0);
    assert_eq!(report.final_balance, summary.final_balance);
}
