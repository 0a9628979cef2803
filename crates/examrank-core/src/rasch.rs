//! 1-parameter Rasch calibration via joint maximum likelihood.
//!
//! Estimates one ability per taker and one difficulty per item from a 0/1
//! response matrix, using a fixed-schedule alternating Newton-Raphson
//! iteration rather than a general-purpose solver. The schedule (12 outer
//! rounds, 2 Newton steps per side) is part of the scoring contract:
//! stored percentiles were produced by exactly this iteration.

/// Tunable calibration constants.
///
/// Defaults reproduce the production schedule; tests can substitute smaller
/// panels or different convergence budgets.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Alternating ability/difficulty rounds.
    pub outer_rounds: u32,
    /// Newton-Raphson steps per parameter within one round.
    pub newton_steps: u32,
    /// Abilities and difficulties are clamped to `[-clamp, clamp]` after
    /// every Newton step.
    pub logit_clamp: f64,
    /// Skip a Newton step when the derivative magnitude falls below this,
    /// instead of dividing by (nearly) zero.
    pub derivative_floor: f64,
    /// Proportions are clamped to `[eps, 1-eps]` before the logit, so
    /// all-correct and all-wrong rows stay finite.
    pub proportion_clamp: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            outer_rounds: 12,
            newton_steps: 2,
            logit_clamp: 6.0,
            derivative_floor: 1e-8,
            proportion_clamp: 1e-6,
        }
    }
}

/// Calibration output: one ability per taker (row) and one difficulty per
/// item (column), on a shared logit scale anchored at mean difficulty 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibration {
    pub abilities: Vec<f64>,
    pub difficulties: Vec<f64>,
}

/// Jointly estimate abilities and difficulties for a takers × items matrix.
///
/// An empty matrix (no takers or no items) yields empty vectors. The model
/// is only identified up to an additive constant, so every round ends by
/// re-centering on mean item difficulty; that anchor keeps results
/// reproducible run to run.
pub fn calibrate(matrix: &[Vec<bool>], config: &CalibrationConfig) -> Calibration {
    let n_takers = matrix.len();
    let n_items = matrix.first().map_or(0, Vec::len);
    if n_takers == 0 || n_items == 0 {
        return Calibration::default();
    }

    let observed = |taker: usize, item: usize| -> f64 {
        if matrix[taker][item] {
            1.0
        } else {
            0.0
        }
    };

    // Initialize difficulties from item p-values: a hard item has a low
    // proportion-correct, hence a high logit(1 - p).
    let mut difficulties: Vec<f64> = (0..n_items)
        .map(|i| {
            let p = (0..n_takers).map(|u| observed(u, i)).sum::<f64>() / n_takers as f64;
            logit(1.0 - p, config.proportion_clamp)
        })
        .collect();

    // Initialize abilities from each taker's proportion-correct.
    let mut abilities: Vec<f64> = (0..n_takers)
        .map(|u| {
            let p = (0..n_items).map(|i| observed(u, i)).sum::<f64>() / n_items as f64;
            logit(p, config.proportion_clamp)
        })
        .collect();

    for _ in 0..config.outer_rounds {
        // Ability side: Newton steps holding difficulties fixed.
        for u in 0..n_takers {
            let mut theta = abilities[u];
            for _ in 0..config.newton_steps {
                let mut residual = 0.0;
                let mut derivative = 0.0;
                for (i, b) in difficulties.iter().enumerate() {
                    let p = sigmoid(theta - b);
                    residual += observed(u, i) - p;
                    derivative -= p * (1.0 - p);
                }
                if derivative.abs() < config.derivative_floor {
                    break;
                }
                theta = (theta - residual / derivative)
                    .clamp(-config.logit_clamp, config.logit_clamp);
            }
            abilities[u] = theta;
        }

        // Item side: symmetric in form, residual sign flipped.
        for i in 0..n_items {
            let mut b = difficulties[i];
            for _ in 0..config.newton_steps {
                let mut residual = 0.0;
                let mut derivative = 0.0;
                for (u, theta) in abilities.iter().enumerate() {
                    let p = sigmoid(theta - b);
                    residual += p - observed(u, i);
                    derivative += p * (1.0 - p);
                }
                if derivative.abs() < config.derivative_floor {
                    break;
                }
                b = (b - residual / derivative).clamp(-config.logit_clamp, config.logit_clamp);
            }
            difficulties[i] = b;
        }

        // Identifiability anchor: mean difficulty = 0.
        let mean_b = difficulties.iter().sum::<f64>() / n_items as f64;
        for b in &mut difficulties {
            *b -= mean_b;
        }
        for theta in &mut abilities {
            *theta -= mean_b;
        }
    }

    Calibration {
        abilities,
        difficulties,
    }
}

fn logit(p: f64, eps: f64) -> f64 {
    let p = p.clamp(eps, 1.0 - eps);
    (p / (1.0 - p)).ln()
}

/// Numerically stable logistic: branches on the sign of the argument so the
/// exponential never overflows.
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
