use log::{debug, info};
use rand::{Rng, seq::SliceRandom};

use super::convergence::{Convergence, Decision, DegeneratePolicy, StopReason};
use crate::{
    Rating, Result,
    arch::{BiasedFactorization, Factorization, PlainFactorization, check_bounds, loss},
    optimization::GradientDescent,
    rating::mean_rating,
};

const PROGRESS_EVERY: usize = 50;

/// Sequential SGD trainer for any `Factorization`.
pub struct Trainer<R: Rng> {
    optimizer: GradientDescent,
    eps: f64,
    max_epochs: usize,
    degenerate: DegeneratePolicy,
    rng: R,
}

/// A trained model together with how its training went.
#[derive(Debug, Clone)]
pub struct Trained<F> {
    model: F,
    error: f64,
    epochs: usize,
    losses: Vec<f64>,
    stop: StopReason,
}

impl<F> Trained<F> {
    pub fn model(&self) -> &F {
        &self.model
    }

    pub fn into_model(self) -> F {
        self.model
    }

    /// Returns the unregularized error of the trained model over the training ratings.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Returns the amount of epochs that were run.
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Returns the regularized loss before training followed by the loss after each epoch.
    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }
}

impl<R: Rng> Trainer<R> {
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `optimizer` - The learning rate and regularization of every step.
    /// * `eps` - The relative loss drop under which training stops.
    /// * `max_epochs` - The maximum amount of epochs to run.
    /// * `degenerate` - What to do when the first epoch does not decrease the loss.
    /// * `rng` - Shuffles the ratings each epoch and initializes new models.
    pub fn new(
        optimizer: GradientDescent,
        eps: f64,
        max_epochs: usize,
        degenerate: DegeneratePolicy,
        rng: R,
    ) -> Self {
        Self {
            optimizer,
            eps,
            max_epochs,
            degenerate,
            rng,
        }
    }

    pub fn optimizer(&self) -> &GradientDescent {
        &self.optimizer
    }

    /// Initializes a `PlainFactorization` and trains it on `ratings`.
    pub fn train_plain(
        &mut self,
        num_users: usize,
        num_items: usize,
        latent_dim: usize,
        ratings: &[Rating],
    ) -> Result<Trained<PlainFactorization>> {
        let model = PlainFactorization::new(num_users, num_items, latent_dim, &mut self.rng)?;
        self.train(model, ratings)
    }

    /// Initializes a `BiasedFactorization` with `mu` set to the mean of `ratings`
    /// and trains it on them.
    pub fn train_biased(
        &mut self,
        num_users: usize,
        num_items: usize,
        latent_dim: usize,
        ratings: &[Rating],
    ) -> Result<Trained<BiasedFactorization>> {
        let mean = mean_rating(ratings);
        let model =
            BiasedFactorization::new(num_users, num_items, latent_dim, mean, &mut self.rng)?;
        self.train(model, ratings)
    }

    /// Trains `model` on `ratings` until convergence or the epoch limit.
    ///
    /// Each epoch visits a freshly shuffled copy of `ratings` and performs one
    /// sequential SGD step per rating; `ratings` itself is never reordered.
    ///
    /// # Errors
    /// `IndexOutOfRange` if any rating falls outside of `model`, checked before
    /// the first epoch, and `DegenerateConvergence` under `DegeneratePolicy::Fail`.
    pub fn train<F: Factorization>(&mut self, mut model: F, ratings: &[Rating]) -> Result<Trained<F>> {
        check_bounds(&model, ratings)?;

        let reg = self.optimizer.reg();
        let mut convergence = Convergence::new(self.eps, self.degenerate);
        let mut losses = Vec::new();
        let mut stop = StopReason::MaxEpochs;

        let mut prev_err = loss(&model, ratings, reg)?;
        losses.push(prev_err);

        let (users, items, latent_dim) = model.dims();
        debug!(
            users = users, items = items, latent_dim = latent_dim, ratings = ratings.len();
            "starting training"
        );

        for epoch in 0..self.max_epochs {
            if (epoch + 1) % PROGRESS_EVERY == 0 {
                info!("currently on epoch #{}", epoch + 1);
            }

            let mut shuffled = ratings.to_vec();
            shuffled.shuffle(&mut self.rng);

            for rating in &shuffled {
                model.sgd_step(rating, &self.optimizer);
            }

            let new_err = loss(&model, ratings, reg)?;
            losses.push(new_err);
            debug!(epoch = epoch, loss = new_err; "epoch finished");

            match convergence.observe(prev_err, new_err)? {
                Decision::Continue => prev_err = new_err,
                Decision::Stop(reason) => {
                    stop = reason;
                    break;
                }
            }
        }

        let epochs = convergence.epochs();
        let error = loss(&model, ratings, 0.0)?;
        info!("training complete after {epochs} epoch(s): {stop:?}, error {error}");

        Ok(Trained {
            model,
            error,
            epochs,
            losses,
            stop,
        })
    }
}
