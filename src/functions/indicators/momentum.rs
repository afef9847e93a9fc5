use super::{mean, rolling};

/// Neutral reading used when a window saw no movement at all.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Relative Strength Index with simple rolling means of gains and losses.
///
/// The first bar has no predecessor and counts as a zero change, so the first defined
/// value sits at index `period - 1`. A window with zero average loss reads 100 when it
/// had any gain and [`RSI_NEUTRAL`] when it was completely flat.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { close - closes[i - 1] };
        gains.push(Some(change.max(0.0)));
        losses.push(Some((-change).max(0.0)));
    }

    let avg_gain = rolling(&gains, period, mean);
    let avg_loss = rolling(&losses, period, mean);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => Some(rsi_from_averages(gain, loss)),
            _ => None,
        })
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            RSI_NEUTRAL
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14);

        assert_eq!(out[12], None);
        assert_eq!(out[13], Some(100.0));
        assert_eq!(out[19], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&closes, 5);

        assert_eq!(out[19], Some(0.0));
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let closes = vec![42.0; 30];
        let out = rsi(&closes, 14);
        assert_eq!(out[29], Some(RSI_NEUTRAL));
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // +1, -1 alternating: equal average gain and loss.
        let closes = [10.0, 11.0, 10.0, 11.0, 10.0];
        let out = rsi(&closes, 4);
        assert_eq!(out[4], Some(50.0));
    }
}
