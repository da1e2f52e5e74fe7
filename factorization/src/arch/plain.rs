//! Plain matrix factorization: the rating of item `j` by user `i` is estimated as
//! `U[i] . V[j]`, with an L2 penalty on both latent matrices.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

use super::model::{self, Factorization, check_dim, init_latent, squared_norm};
use crate::{
    FactorizationErr, Rating, Result, optimization::GradientDescent, training::TrainerBuilder,
};

/// A user-latent matrix `U` (`users x k`) and an item-latent matrix `V` (`items x k`).
#[derive(Debug, Clone, PartialEq)]
pub struct PlainFactorization {
    users: Array2<f64>,
    items: Array2<f64>,
}

impl PlainFactorization {
    /// Creates a new `PlainFactorization` with every latent entry drawn uniformly
    /// from `[-0.5, 0.5)`.
    ///
    /// # Arguments
    /// * `num_users` - The amount of users (`M`).
    /// * `num_items` - The amount of items (`N`).
    /// * `latent_dim` - The dimensionality of the latent vectors (`K`).
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// An `InvalidDimension` error if any of the sizes is zero.
    pub fn new<R: Rng>(
        num_users: usize,
        num_items: usize,
        latent_dim: usize,
        rng: &mut R,
    ) -> Result<Self> {
        check_dim("users", num_users)?;
        check_dim("items", num_items)?;
        check_dim("latent dimension", latent_dim)?;

        Ok(Self {
            users: init_latent(num_users, latent_dim, rng),
            items: init_latent(num_items, latent_dim, rng),
        })
    }

    /// Creates a new `PlainFactorization` from already built latent matrices.
    ///
    /// # Returns
    /// An `InvalidDimension` error if the matrices are empty or their latent
    /// dimensions differ.
    pub fn from_parts(users: Array2<f64>, items: Array2<f64>) -> Result<Self> {
        check_dim("users", users.nrows())?;
        check_dim("items", items.nrows())?;

        if users.ncols() != items.ncols() {
            return Err(FactorizationErr::InvalidDimension {
                what: "item latent dimension",
                got: items.ncols(),
            });
        }

        Ok(Self { users, items })
    }

    pub fn users(&self) -> ArrayView2<'_, f64> {
        self.users.view()
    }

    pub fn items(&self) -> ArrayView2<'_, f64> {
        self.items.view()
    }

    /// Returns `(U, V)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (self.users, self.items)
    }
}

impl Factorization for PlainFactorization {
    fn dims(&self) -> (usize, usize, usize) {
        (self.users.nrows(), self.items.nrows(), self.users.ncols())
    }

    fn predict(&self, user: usize, item: usize) -> f64 {
        self.users.row(user).dot(&self.items.row(item))
    }

    fn penalty(&self) -> f64 {
        squared_norm(&self.users) + squared_norm(&self.items)
    }

    fn sgd_step(&mut self, rating: &Rating, optimizer: &GradientDescent) {
        let &Rating { user, item, value } = rating;

        let residual = value - self.predict(user, item);
        let step = optimizer.latent_step(self.users.row(user), self.items.row(item), residual);
        optimizer.update_params(self.users.row_mut(user), &step);

        // V[j] sees the U[i] written above.
        let residual = value - self.predict(user, item);
        let step = optimizer.latent_step(self.items.row(item), self.users.row(user), residual);
        optimizer.update_params(self.items.row_mut(item), &step);
    }
}

/// The step taken by `U[i]` on the rating `yij`: `eta * (reg * Ui - Vj * (Yij - Ui . Vj))`.
pub fn grad_u(ui: ArrayView1<f64>, yij: f64, vj: ArrayView1<f64>, reg: f64, eta: f64) -> Array1<f64> {
    GradientDescent::new(eta, reg).latent_step(ui, vj, yij - ui.dot(&vj))
}

/// The step taken by `V[j]` on the rating `yij`: `eta * (reg * Vj - Ui * (Yij - Ui . Vj))`.
pub fn grad_v(vj: ArrayView1<f64>, yij: f64, ui: ArrayView1<f64>, reg: f64, eta: f64) -> Array1<f64> {
    GradientDescent::new(eta, reg).latent_step(vj, ui, yij - ui.dot(&vj))
}

/// Computes `0.5 * sum((y - Ui . Vj)^2) + reg / 2 * (|U|_F^2 + |V|_F^2)`.
///
/// # Errors
/// `IndexOutOfRange` if any rating falls outside of `users` or `items`, and
/// `InvalidDimension` if the latent dimensions differ.
pub fn loss(
    users: ArrayView2<f64>,
    items: ArrayView2<f64>,
    ratings: &[Rating],
    reg: f64,
) -> Result<f64> {
    let model = PlainFactorization::from_parts(users.to_owned(), items.to_owned())?;
    model::loss(&model, ratings, reg)
}

/// Trains a `num_users x latent_dim` user matrix and a `num_items x latent_dim`
/// item matrix on `ratings`.
///
/// Stops after `max_epochs` epochs, or once the decrease in regularized loss of an
/// epoch is at most `eps` times the decrease of the first one.
///
/// # Returns
/// `(U, V, err)` where `err` is the unregularized error of the trained model.
#[allow(clippy::too_many_arguments)]
pub fn train(
    num_users: usize,
    num_items: usize,
    latent_dim: usize,
    eta: f64,
    reg: f64,
    ratings: &[Rating],
    eps: f64,
    max_epochs: usize,
) -> Result<(Array2<f64>, Array2<f64>, f64)> {
    let mut trainer = TrainerBuilder::new()
        .learning_rate(eta)
        .reg(reg)
        .eps(eps)
        .max_epochs(max_epochs)
        .build()?;

    let trained = trainer.train_plain(num_users, num_items, latent_dim, ratings)?;
    let error = trained.error();
    let (users, items) = trained.into_model().into_parts();

    Ok((users, items, error))
}
