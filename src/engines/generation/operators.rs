use crate::config::genes::{Bounds, GeneConfig, MutationBounds, SkewConfig};
use crate::engines::generation::genome::{Gene, GeneKind, Genome};
use rand::seq::SliceRandom;
use rand::Rng;

fn sample<R: Rng>(bounds: Bounds, rng: &mut R) -> f64 {
    rng.gen_range(bounds.min..=bounds.max)
}

/// Draw a random genome from the configured initial ranges, skew constraint repaired.
pub fn random_genome<R: Rng>(config: &GeneConfig, rng: &mut R) -> Genome {
    let init = &config.init;
    let sl_multiplier = sample(init.sl_multiplier, rng);
    let tp_multiplier = sl_multiplier * sample(init.tp_ratio, rng);

    let mut genome = Genome {
        w_trend: sample(init.w_trend, rng),
        w_mean_rev: sample(init.w_mean_rev, rng),
        w_vol: sample(init.w_vol, rng),
        rsi_period: rng.gen_range(init.rsi_period.min..=init.rsi_period.max),
        buy_thresh: sample(init.buy_thresh, rng),
        sell_thresh: sample(init.sell_thresh, rng),
        sl_multiplier,
        tp_multiplier,
    };
    repair_skew(&mut genome, &config.skew, rng);
    genome
}

/// Restore `tp >= factor * sl` in place. Returns whether a repair was needed.
pub fn repair_skew<R: Rng>(genome: &mut Genome, skew: &SkewConfig, rng: &mut R) -> bool {
    if genome.satisfies_skew(skew.factor) {
        return false;
    }
    genome.tp_multiplier = genome.sl_multiplier * sample(skew.repair_ratio, rng);
    true
}

/// Shift one gene by `delta` and clamp it according to its kind.
///
/// Period genes move by `delta` rounded to a whole step; multipliers are floored;
/// everything else is clamped to the unit bounds.
pub fn perturb(genome: &mut Genome, gene: Gene, delta: f64, bounds: &MutationBounds) {
    let current = genome.get(gene);
    let next = match gene.kind() {
        GeneKind::Period => bounds.period.clamp(current as i64 + delta.round() as i64) as f64,
        GeneKind::Multiplier => (current + delta).max(bounds.multiplier_floor),
        GeneKind::Unit => bounds.unit.clamp(current + delta),
    };
    genome.set(gene, next);
}

/// With probability `rate`, perturb one uniformly chosen gene; then repair the skew
/// constraint whether or not a gene moved.
pub fn mutate<R: Rng>(genome: &Genome, config: &GeneConfig, rate: f64, rng: &mut R) -> Genome {
    let mut child = *genome;
    let bounds = &config.mutation;

    if rng.gen::<f64>() < rate {
        if let Some(&gene) = Gene::ALL.choose(rng) {
            let delta = match gene.kind() {
                GeneKind::Period => {
                    let step = bounds.period_step as f64;
                    if rng.gen_bool(0.5) { step } else { -step }
                }
                GeneKind::Multiplier => {
                    rng.gen_range(-bounds.multiplier_delta..=bounds.multiplier_delta)
                }
                GeneKind::Unit => rng.gen_range(-bounds.unit_delta..=bounds.unit_delta),
            };
            perturb(&mut child, gene, delta, bounds);
        }
    }

    repair_skew(&mut child, &config.skew, rng);
    child
}

/// Arithmetic crossover: every gene is the mean of the parents' genes.
pub fn crossover(parent1: &Genome, parent2: &Genome) -> Genome {
    let mut child = *parent1;
    for gene in Gene::ALL {
        child.set(gene, (parent1.get(gene) + parent2.get(gene)) / 2.0);
    }
    child
}
