use crate::{FactorizationErr, Result};

/// What to do when the first epoch does not decrease the loss, which leaves the
/// stopping ratio `loss_drop / init_drop` undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Stop right after the first epoch.
    #[default]
    Stop,
    /// Never check the ratio and run until the epoch limit.
    Continue,
    /// Fail with `DegenerateConvergence`.
    Fail,
}

/// Why a training run ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// The loss drop of epoch `epoch` fell to at most `eps` times the first one.
    Converged { epoch: usize },
    /// The first epoch did not decrease the loss.
    Degenerate { init_drop: f64 },
    /// The epoch limit was reached.
    MaxEpochs,
}

/// The outcome of observing an epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Continue,
    Stop(StopReason),
}

/// Relative loss-drop stopping rule.
///
/// The drop of the first epoch is the reference; any later epoch whose drop is at
/// most `eps` times that reference ends training.
#[derive(Debug, Clone)]
pub struct Convergence {
    eps: f64,
    policy: DegeneratePolicy,
    init_drop: Option<f64>,
    epoch: usize,
}

impl Convergence {
    /// Creates a new `Convergence`.
    ///
    /// # Arguments
    /// * `eps` - The fraction of the first epoch's loss drop under which training stops.
    /// * `policy` - What to do when the first epoch's loss drop is not positive.
    pub fn new(eps: f64, policy: DegeneratePolicy) -> Self {
        Self {
            eps,
            policy,
            init_drop: None,
            epoch: 0,
        }
    }

    /// Returns the amount of epochs observed so far.
    pub fn epochs(&self) -> usize {
        self.epoch
    }

    /// Feeds the loss before and after the next epoch.
    ///
    /// # Arguments
    /// * `prev` - The loss before the epoch.
    /// * `new` - The loss after the epoch.
    ///
    /// # Returns
    /// Whether training should go on, or `DegenerateConvergence` under
    /// `DegeneratePolicy::Fail`.
    pub fn observe(&mut self, prev: f64, new: f64) -> Result<Decision> {
        let epoch = self.epoch;
        self.epoch += 1;

        let loss_drop = prev - new;

        let Some(init_drop) = self.init_drop else {
            self.init_drop = Some(loss_drop);

            if loss_drop > 0.0 {
                return Ok(Decision::Continue);
            }

            return match self.policy {
                DegeneratePolicy::Stop => Ok(Decision::Stop(StopReason::Degenerate {
                    init_drop: loss_drop,
                })),
                DegeneratePolicy::Continue => Ok(Decision::Continue),
                DegeneratePolicy::Fail => Err(FactorizationErr::DegenerateConvergence {
                    init_drop: loss_drop,
                }),
            };
        };

        // only reachable with `DegeneratePolicy::Continue`
        if init_drop <= 0.0 {
            return Ok(Decision::Continue);
        }

        if loss_drop / init_drop <= self.eps {
            return Ok(Decision::Stop(StopReason::Converged { epoch }));
        }

        Ok(Decision::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs `losses` through a fresh `Convergence` and returns the index of the
    /// epoch that stopped it.
    fn stopping_epoch(losses: &[f64], eps: f64, policy: DegeneratePolicy) -> Option<usize> {
        let mut convergence = Convergence::new(eps, policy);

        for (epoch, pair) in losses.windows(2).enumerate() {
            if let Decision::Stop(_) = convergence.observe(pair[0], pair[1]).unwrap() {
                return Some(epoch);
            }
        }

        None
    }

    #[test]
    fn stops_exactly_when_ratio_crosses_eps() {
        // drops: 100, 50, 10, 1, 0.1, 0.01 -> ratios 0.5, 0.1, 0.01, 0.001, 0.0001
        let losses = [1000.0, 900.0, 850.0, 840.0, 839.0, 838.9, 838.89];

        assert_eq!(stopping_epoch(&losses, 0.5, DegeneratePolicy::Stop), Some(1));
        assert_eq!(stopping_epoch(&losses, 0.05, DegeneratePolicy::Stop), Some(3));
        assert_eq!(stopping_epoch(&losses, 0.005, DegeneratePolicy::Stop), Some(4));
        assert_eq!(stopping_epoch(&losses, 1e-6, DegeneratePolicy::Stop), None);
    }

    #[test]
    fn first_epoch_never_converges() {
        let mut convergence = Convergence::new(10.0, DegeneratePolicy::Stop);
        assert_eq!(convergence.observe(10.0, 5.0).unwrap(), Decision::Continue);
        assert_eq!(
            convergence.observe(5.0, 4.0).unwrap(),
            Decision::Stop(StopReason::Converged { epoch: 1 })
        );
    }

    #[test]
    fn loss_increase_stops() {
        let mut convergence = Convergence::new(1e-4, DegeneratePolicy::Stop);
        convergence.observe(10.0, 5.0).unwrap();

        assert_eq!(
            convergence.observe(5.0, 6.0).unwrap(),
            Decision::Stop(StopReason::Converged { epoch: 1 })
        );
    }

    #[test]
    fn degenerate_stop_policy() {
        let mut convergence = Convergence::new(1e-4, DegeneratePolicy::Stop);

        assert_eq!(
            convergence.observe(3.0, 3.0).unwrap(),
            Decision::Stop(StopReason::Degenerate { init_drop: 0.0 })
        );
    }

    #[test]
    fn degenerate_continue_policy_never_stops() {
        let losses = [3.0, 4.0, 2.0, 1.0, 1.0, 1.0];
        assert_eq!(stopping_epoch(&losses, 1e-4, DegeneratePolicy::Continue), None);
    }

    #[test]
    fn degenerate_fail_policy() {
        let mut convergence = Convergence::new(1e-4, DegeneratePolicy::Fail);

        assert_eq!(
            convergence.observe(3.0, 3.5).unwrap_err(),
            FactorizationErr::DegenerateConvergence { init_drop: -0.5 }
        );
    }
}
