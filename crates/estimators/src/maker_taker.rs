//! Maker/Taker Predictor
//!
//! Logistic regression of the maker share of a fill on book features:
//!
//! ```text
//! zⱼ = (xⱼ - μⱼ) / σⱼ                     standardised spread, depth, volume, volatility
//! p  = 1 / (1 + e^-(b + Σ wⱼ zⱼ))
//! ```
//!
//! Targets are proportions in [0, 1] (soft labels), fitted by batch gradient
//! descent on the cross-entropy with a small L2 penalty.

use std::collections::VecDeque;

use costsim_core::OrderBook;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

const FEATURES: usize = 4;

/// Book state a maker/taker split is predicted from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketFeatures {
    pub spread: f64,
    pub depth: f64,
    pub volume: f64,
    pub volatility: f64,
}

impl MarketFeatures {
    pub fn from_book(book: &OrderBook, volatility: f64) -> Self {
        Self {
            spread: book.spread().to_f64().unwrap_or(0.0),
            depth: book.depth().to_f64().unwrap_or(0.0),
            volume: book.total_volume().to_f64().unwrap_or(0.0),
            volatility,
        }
    }

    fn to_array(self) -> [f64; FEATURES] {
        [self.spread, self.depth, self.volume, self.volatility]
    }

    fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakerTakerConfig {
    /// Samples required before the model is used
    pub min_samples: usize,
    /// Number of samples kept for fitting
    pub history_window: usize,
    pub learning_rate: f64,
    pub iterations: usize,
    /// L2 penalty on the feature weights
    pub l2: f64,
}

impl Default for MakerTakerConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            history_window: 500,
            learning_rate: 0.1,
            iterations: 500,
            l2: 1e-3,
        }
    }
}

/// Fitted weights with the standardisation they were fitted under
#[derive(Debug, Clone, Copy, PartialEq)]
struct Logit {
    mean: [f64; FEATURES],
    scale: [f64; FEATURES],
    weights: [f64; FEATURES],
    bias: f64,
}

impl Logit {
    fn standardise(&self, x: [f64; FEATURES]) -> [f64; FEATURES] {
        let mut z = [0.0; FEATURES];
        for j in 0..FEATURES {
            z[j] = (x[j] - self.mean[j]) / self.scale[j];
        }
        z
    }

    fn probability(&self, z: &[f64; FEATURES]) -> f64 {
        let linear = self.bias
            + self
                .weights
                .iter()
                .zip(z)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        sigmoid(linear)
    }
}

/// Predicts the share of an order that will fill passively
#[derive(Debug, Clone)]
pub struct MakerTakerPredictor {
    config: MakerTakerConfig,
    history: VecDeque<(MarketFeatures, f64)>,
    model: Option<Logit>,
    stale: bool,
}

impl MakerTakerPredictor {
    pub fn new(config: MakerTakerConfig) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(config.history_window),
            model: None,
            stale: false,
        }
    }

    pub fn samples(&self) -> usize {
        self.history.len()
    }

    /// Record an observed maker proportion for `features`
    ///
    /// The target is clamped to [0, 1]; non-finite samples are ignored.
    pub fn update(&mut self, features: MarketFeatures, maker_proportion: f64) {
        if !features.is_finite() || !maker_proportion.is_finite() {
            return;
        }
        if self.config.history_window == 0 {
            return;
        }
        while self.history.len() >= self.config.history_window {
            self.history.pop_front();
        }
        self.history
            .push_back((features, maker_proportion.clamp(0.0, 1.0)));
        self.stale = true;
    }

    /// Expected maker proportion in [0, 1]
    ///
    /// 0.5 until `min_samples` observations have been recorded.
    pub fn predict(&mut self, features: &MarketFeatures) -> f64 {
        if self.history.len() < self.config.min_samples.max(1) || !features.is_finite() {
            return 0.5;
        }
        if self.stale || self.model.is_none() {
            self.model = Some(self.fit());
            self.stale = false;
            log::trace!("maker/taker model refitted on {} samples", self.history.len());
        }
        match &self.model {
            Some(model) => model.probability(&model.standardise(features.to_array())),
            None => 0.5,
        }
    }

    fn fit(&self) -> Logit {
        let n = self.history.len() as f64;
        let rows: Vec<[f64; FEATURES]> = self.history.iter().map(|(f, _)| f.to_array()).collect();
        let targets: Vec<f64> = self.history.iter().map(|(_, y)| *y).collect();

        let mut mean = [0.0; FEATURES];
        for row in &rows {
            for j in 0..FEATURES {
                mean[j] += row[j] / n;
            }
        }
        let mut scale = [0.0; FEATURES];
        for row in &rows {
            for j in 0..FEATURES {
                scale[j] += (row[j] - mean[j]).powi(2) / n;
            }
        }
        for s in &mut scale {
            *s = if *s > 1e-24 { s.sqrt() } else { 1.0 };
        }

        let mut model = Logit {
            mean,
            scale,
            weights: [0.0; FEATURES],
            bias: 0.0,
        };
        let standardised: Vec<[f64; FEATURES]> =
            rows.iter().map(|row| model.standardise(*row)).collect();

        let lr = self.config.learning_rate;
        for _ in 0..self.config.iterations {
            let mut grad_w = [0.0; FEATURES];
            let mut grad_b = 0.0;
            for (z, y) in standardised.iter().zip(&targets) {
                let error = model.probability(z) - y;
                for j in 0..FEATURES {
                    grad_w[j] += error * z[j] / n;
                }
                grad_b += error / n;
            }
            for j in 0..FEATURES {
                model.weights[j] -= lr * (grad_w[j] + self.config.l2 * model.weights[j]);
            }
            model.bias -= lr * grad_b;
        }
        model
    }
}

impl Default for MakerTakerPredictor {
    fn default() -> Self {
        Self::new(MakerTakerConfig::default())
    }
}

/// Numerically stable logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
