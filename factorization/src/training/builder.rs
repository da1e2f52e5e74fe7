use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{DegeneratePolicy, Trainer};
use crate::{FactorizationErr, Result, optimization::GradientDescent};

/// Builds `Trainer`s.
///
/// Defaults to `eps = 1e-4` and `max_epochs = 300`, with a learning rate of `0.01`,
/// no regularization and an OS-seeded rng.
#[derive(Debug, Clone)]
pub struct TrainerBuilder {
    learning_rate: f64,
    reg: f64,
    eps: f64,
    max_epochs: usize,
    degenerate: DegeneratePolicy,
    seed: Option<u64>,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            reg: 0.0,
            eps: 1e-4,
            max_epochs: 300,
            degenerate: DegeneratePolicy::default(),
            seed: None,
        }
    }
}

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the learning rate (`eta`).
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the L2 regularization strength (`reg`).
    pub fn reg(mut self, reg: f64) -> Self {
        self.reg = reg;
        self
    }

    /// Sets the fraction of the first epoch's loss drop under which training stops.
    pub fn eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }

    /// Seeds the rng used for initialization and shuffling, making runs reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds a new `Trainer` backed by a `StdRng`.
    ///
    /// # Returns
    /// An `InvalidHyperparameter` error if the learning rate, the regularization or
    /// `eps` is negative or not finite.
    pub fn build(self) -> Result<Trainer<StdRng>> {
        let rng = self.generate_rng();
        self.build_with_rng(rng)
    }

    /// Builds a new `Trainer` that draws from `rng`.
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<Trainer<R>> {
        check_hyperparameter("learning rate", self.learning_rate)?;
        check_hyperparameter("reg", self.reg)?;
        check_hyperparameter("eps", self.eps)?;

        let optimizer = GradientDescent::new(self.learning_rate, self.reg);

        Ok(Trainer::new(
            optimizer,
            self.eps,
            self.max_epochs,
            self.degenerate,
            rng,
        ))
    }

    fn generate_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn check_hyperparameter(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FactorizationErr::InvalidHyperparameter { name, value });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_hyperparameters() {
        let err = TrainerBuilder::new().learning_rate(-0.1).build().err();
        assert_eq!(
            err,
            Some(FactorizationErr::InvalidHyperparameter {
                name: "learning rate",
                value: -0.1
            })
        );

        assert!(TrainerBuilder::new().reg(f64::INFINITY).build().is_err());
        assert!(TrainerBuilder::new().eps(f64::NAN).build().is_err());
    }

    #[test]
    fn carries_hyperparameters_into_the_optimizer() {
        let trainer = TrainerBuilder::new()
            .learning_rate(0.2)
            .reg(0.3)
            .seed(5)
            .build()
            .unwrap();

        assert_eq!(*trainer.optimizer(), GradientDescent::new(0.2, 0.3));
    }
}
