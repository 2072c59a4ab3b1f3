//! Execution Trajectory
//!
//! The optimal schedule as two parallel sequences: time grid and remaining
//! quantity at each grid point.

use serde::{Deserialize, Serialize};

/// Remaining quantity as a function of time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrajectory {
    /// Equally spaced time points, first is 0 and last is the horizon
    pub times: Vec<f64>,
    /// Quantity still to execute at the matching time point
    pub quantities: Vec<f64>,
}

impl ExecutionTrajectory {
    pub(crate) fn new(times: Vec<f64>, quantities: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), quantities.len());
        Self { times, quantities }
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(time, remaining)` pairs in time order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.quantities.iter().copied())
    }

    /// Horizon covered by the schedule (last time point)
    pub fn horizon(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Quantity executed within each interval `[t_i, t_{i+1}]`
    ///
    /// One element shorter than the trajectory. The trade list sums to the
    /// initial quantity minus the final one.
    pub fn trade_list(&self) -> Vec<f64> {
        self.quantities.windows(2).map(|w| w[0] - w[1]).collect()
    }

    /// Remaining quantity at an arbitrary time
    ///
    /// Linear interpolation between the two surrounding grid points. Times
    /// before the start or after the horizon are clamped.
    pub fn remaining_at(&self, time: f64) -> f64 {
        let (Some(&first_t), Some(&last_t)) = (self.times.first(), self.times.last()) else {
            return 0.0;
        };
        if time <= first_t {
            return self.quantities[0];
        }
        if time >= last_t {
            return self.quantities[self.quantities.len() - 1];
        }

        // First grid point strictly after `time`; guaranteed to be > 0 here
        let upper = self.times.partition_point(|&t| t <= time);
        let lower = upper - 1;
        let (t0, t1) = (self.times[lower], self.times[upper]);
        let (x0, x1) = (self.quantities[lower], self.quantities[upper]);
        let weight = (time - t0) / (t1 - t0);
        x0 + (x1 - x0) * weight
    }

    /// Fraction of the initial quantity already executed at each grid point
    pub fn completion(&self) -> Vec<f64> {
        let initial = self.quantities.first().copied().unwrap_or(0.0);
        if initial == 0.0 {
            return vec![1.0; self.quantities.len()];
        }
        self.quantities.iter().map(|x| 1.0 - x / initial).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> ExecutionTrajectory {
        ExecutionTrajectory::new(vec![0.0, 1.0, 2.0], vec![10.0, 4.0, 0.0])
    }

    #[test]
    fn test_trade_list() {
        let trades = linear().trade_list();
        assert_eq!(trades, vec![6.0, 4.0]);
        assert!((trades.iter().sum::<f64>() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_remaining_at_interpolates() {
        let trajectory = linear();
        assert!((trajectory.remaining_at(0.5) - 7.0).abs() < 1e-12);
        assert!((trajectory.remaining_at(1.0) - 4.0).abs() < 1e-12);
        assert!((trajectory.remaining_at(1.5) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_remaining_at_clamps() {
        let trajectory = linear();
        assert_eq!(trajectory.remaining_at(-1.0), 10.0);
        assert_eq!(trajectory.remaining_at(5.0), 0.0);
    }

    #[test]
    fn test_completion() {
        let completion = linear().completion();
        let expected = [0.0, 0.6, 1.0];
        for (got, want) in completion.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(linear().horizon(), 2.0);
    }
}
