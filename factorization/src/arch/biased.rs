//! Bias-augmented matrix factorization: the rating of item `j` by user `i` is
//! estimated as `mu + U[i] . V[j] + a[i] + b[j]`, where `mu` is the global mean
//! rating and `a`, `b` are per-user and per-item offsets.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

use super::model::{self, Factorization, check_dim, init_latent, squared_norm};
use crate::{
    FactorizationErr, Rating, Result, optimization::GradientDescent, training::TrainerBuilder,
};

/// The scalar terms of a biased prediction for a single `(i, j)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offsets {
    /// The global mean rating `mu`.
    pub mean: f64,
    /// The user bias `a[i]`.
    pub user_bias: f64,
    /// The item bias `b[j]`.
    pub item_bias: f64,
}

impl Offsets {
    fn residual(&self, yij: f64, ui: ArrayView1<f64>, vj: ArrayView1<f64>) -> f64 {
        yij - self.mean - ui.dot(&vj) - self.user_bias - self.item_bias
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiasedFactorization {
    users: Array2<f64>,
    items: Array2<f64>,
    user_biases: Array1<f64>,
    item_biases: Array1<f64>,
    mean: f64,
}

impl BiasedFactorization {
    /// Creates a new `BiasedFactorization` with uniform `[-0.5, 0.5)` latent
    /// matrices and zeroed biases.
    ///
    /// A `latent_dim` of zero is allowed and leaves a bias-only model.
    ///
    /// # Arguments
    /// * `num_users` - The amount of users (`M`).
    /// * `num_items` - The amount of items (`N`).
    /// * `latent_dim` - The dimensionality of the latent vectors (`K`).
    /// * `mean` - The global mean rating (`mu`), fixed for the model's lifetime.
    /// * `rng` - A random number generator.
    pub fn new<R: Rng>(
        num_users: usize,
        num_items: usize,
        latent_dim: usize,
        mean: f64,
        rng: &mut R,
    ) -> Result<Self> {
        check_dim("users", num_users)?;
        check_dim("items", num_items)?;

        Ok(Self {
            users: init_latent(num_users, latent_dim, rng),
            items: init_latent(num_items, latent_dim, rng),
            user_biases: Array1::zeros(num_users),
            item_biases: Array1::zeros(num_items),
            mean,
        })
    }

    /// Creates a new `BiasedFactorization` from already built parameters.
    ///
    /// # Returns
    /// An `InvalidDimension` error if the shapes are inconsistent.
    pub fn from_parts(
        users: Array2<f64>,
        items: Array2<f64>,
        user_biases: Array1<f64>,
        item_biases: Array1<f64>,
        mean: f64,
    ) -> Result<Self> {
        check_dim("users", users.nrows())?;
        check_dim("items", items.nrows())?;

        if users.ncols() != items.ncols() {
            return Err(FactorizationErr::InvalidDimension {
                what: "item latent dimension",
                got: items.ncols(),
            });
        }

        if user_biases.len() != users.nrows() {
            return Err(FactorizationErr::InvalidDimension {
                what: "user biases",
                got: user_biases.len(),
            });
        }

        if item_biases.len() != items.nrows() {
            return Err(FactorizationErr::InvalidDimension {
                what: "item biases",
                got: item_biases.len(),
            });
        }

        Ok(Self {
            users,
            items,
            user_biases,
            item_biases,
            mean,
        })
    }

    pub fn users(&self) -> ArrayView2<'_, f64> {
        self.users.view()
    }

    pub fn items(&self) -> ArrayView2<'_, f64> {
        self.items.view()
    }

    pub fn user_biases(&self) -> ArrayView1<'_, f64> {
        self.user_biases.view()
    }

    pub fn item_biases(&self) -> ArrayView1<'_, f64> {
        self.item_biases.view()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns `(U, V, a, b)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>) {
        (self.users, self.items, self.user_biases, self.item_biases)
    }

    fn offsets(&self, user: usize, item: usize) -> Offsets {
        Offsets {
            mean: self.mean,
            user_bias: self.user_biases[user],
            item_bias: self.item_biases[item],
        }
    }

    fn residual(&self, rating: &Rating) -> f64 {
        self.offsets(rating.user, rating.item).residual(
            rating.value,
            self.users.row(rating.user),
            self.items.row(rating.item),
        )
    }
}

impl Factorization for BiasedFactorization {
    fn dims(&self) -> (usize, usize, usize) {
        (self.users.nrows(), self.items.nrows(), self.users.ncols())
    }

    fn predict(&self, user: usize, item: usize) -> f64 {
        self.mean
            + self.users.row(user).dot(&self.items.row(item))
            + self.user_biases[user]
            + self.item_biases[item]
    }

    fn penalty(&self) -> f64 {
        squared_norm(&self.users)
            + squared_norm(&self.items)
            + squared_norm(&self.user_biases)
            + squared_norm(&self.item_biases)
    }

    /// Updates `U[i]`, `V[j]`, `a[i]` and `b[j]` in that order, recomputing the
    /// residual before each one.
    fn sgd_step(&mut self, rating: &Rating, optimizer: &GradientDescent) {
        let &Rating { user, item, .. } = rating;

        let residual = self.residual(rating);
        let step = optimizer.latent_step(self.users.row(user), self.items.row(item), residual);
        optimizer.update_params(self.users.row_mut(user), &step);

        let residual = self.residual(rating);
        let step = optimizer.latent_step(self.items.row(item), self.users.row(user), residual);
        optimizer.update_params(self.items.row_mut(item), &step);

        let residual = self.residual(rating);
        self.user_biases[user] -= optimizer.offset_step(self.user_biases[user], residual);

        let residual = self.residual(rating);
        self.item_biases[item] -= optimizer.offset_step(self.item_biases[item], residual);
    }
}

/// The step taken by `U[i]`: `eta * (reg * Ui - Vj * r)` with
/// `r = Yij - mu - Ui . Vj - ai - bj`.
pub fn grad_u(
    ui: ArrayView1<f64>,
    yij: f64,
    vj: ArrayView1<f64>,
    offsets: Offsets,
    reg: f64,
    eta: f64,
) -> Array1<f64> {
    let residual = offsets.residual(yij, ui, vj);
    GradientDescent::new(eta, reg).latent_step(ui, vj, residual)
}

/// The step taken by `V[j]`: `eta * (reg * Vj - Ui * r)`.
pub fn grad_v(
    vj: ArrayView1<f64>,
    yij: f64,
    ui: ArrayView1<f64>,
    offsets: Offsets,
    reg: f64,
    eta: f64,
) -> Array1<f64> {
    let residual = offsets.residual(yij, ui, vj);
    GradientDescent::new(eta, reg).latent_step(vj, ui, residual)
}

/// The step taken by `a[i]`: `eta * (reg * ai - r)`.
pub fn grad_a(
    ui: ArrayView1<f64>,
    yij: f64,
    vj: ArrayView1<f64>,
    offsets: Offsets,
    reg: f64,
    eta: f64,
) -> f64 {
    let residual = offsets.residual(yij, ui, vj);
    GradientDescent::new(eta, reg).offset_step(offsets.user_bias, residual)
}

/// The step taken by `b[j]`: `eta * (reg * bj - r)`.
pub fn grad_b(
    ui: ArrayView1<f64>,
    yij: f64,
    vj: ArrayView1<f64>,
    offsets: Offsets,
    reg: f64,
    eta: f64,
) -> f64 {
    let residual = offsets.residual(yij, ui, vj);
    GradientDescent::new(eta, reg).offset_step(offsets.item_bias, residual)
}

/// Computes `0.5 * sum((y - y_hat)^2) + reg / 2 * (|U|_F^2 + |V|_F^2 + |a|^2 + |b|^2)`.
///
/// # Errors
/// `IndexOutOfRange` if any rating falls outside of the parameters, and
/// `InvalidDimension` if their shapes are inconsistent.
pub fn loss(
    users: ArrayView2<f64>,
    items: ArrayView2<f64>,
    user_biases: ArrayView1<f64>,
    item_biases: ArrayView1<f64>,
    mean: f64,
    ratings: &[Rating],
    reg: f64,
) -> Result<f64> {
    let model = BiasedFactorization::from_parts(
        users.to_owned(),
        items.to_owned(),
        user_biases.to_owned(),
        item_biases.to_owned(),
        mean,
    )?;

    model::loss(&model, ratings, reg)
}

/// The parameters of a trained `BiasedFactorization` and its unregularized error.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasedParts {
    pub users: Array2<f64>,
    pub items: Array2<f64>,
    pub user_biases: Array1<f64>,
    pub item_biases: Array1<f64>,
    pub error: f64,
}

/// Trains a biased factorization on `ratings`, with `mu` set to their mean value.
///
/// The stopping rule is the same as `plain::train`.
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
) -> Result<BiasedParts> {
    let mut trainer = TrainerBuilder::new()
        .learning_rate(eta)
        .reg(reg)
        .eps(eps)
        .max_epochs(max_epochs)
        .build()?;

    let trained = trainer.train_biased(num_users, num_items, latent_dim, ratings)?;
    let error = trained.error();
    let (users, items, user_biases, item_biases) = trained.into_model().into_parts();

    Ok(BiasedParts {
        users,
        items,
        user_biases,
        item_biases,
        error,
    })
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn zero_latent_dim_is_allowed() {
        let mut rng = rand::rng();
        let model = BiasedFactorization::new(3, 2, 0, 3.0, &mut rng).unwrap();

        assert_eq!(model.dims(), (3, 2, 0));
        assert_eq!(model.predict(2, 1), 3.0);
    }

    #[test]
    fn loss_includes_bias_penalty() {
        let ratings = [Rating::new(0, 0, 4.0), Rating::new(1, 0, 1.0)];
        let u = array![[1.0], [0.0]];
        let v = array![[2.0]];
        let a = array![0.5, -1.0];
        let b = array![0.25];

        // predictions: 1 + 2 + 0.5 + 0.25 = 3.75, 1 + 0 - 1 + 0.25 = 0.25
        let squared = 0.25f64.powi(2) + 0.75f64.powi(2);
        let penalty = 1.0 + 4.0 + 1.25 + 0.0625;

        let l = loss(u.view(), v.view(), a.view(), b.view(), 1.0, &ratings, 0.5).unwrap();

        assert!((l - (0.5 * squared + 0.25 * penalty)).abs() < 1e-12);
    }

    #[test]
    fn grads_scale_linearly_with_eta() {
        let ui = array![0.3, -0.2];
        let vj = array![-0.4, 0.25];
        let offsets = Offsets {
            mean: 3.5,
            user_bias: 0.2,
            item_bias: -0.1,
        };

        for eta in [0.0, 0.05, 2.0] {
            let gu = grad_u(ui.view(), 4.0, vj.view(), offsets, 0.1, eta);
            let gu1 = grad_u(ui.view(), 4.0, vj.view(), offsets, 0.1, 1.0) * eta;
            let gv = grad_v(vj.view(), 4.0, ui.view(), offsets, 0.1, eta);
            let gv1 = grad_v(vj.view(), 4.0, ui.view(), offsets, 0.1, 1.0) * eta;
            let ga = grad_a(ui.view(), 4.0, vj.view(), offsets, 0.1, eta);
            let gb = grad_b(ui.view(), 4.0, vj.view(), offsets, 0.1, eta);

            assert!(gu.iter().zip(&gu1).all(|(a, b)| (a - b).abs() < 1e-12));
            assert!(gv.iter().zip(&gv1).all(|(a, b)| (a - b).abs() < 1e-12));
            assert!((ga - eta * grad_a(ui.view(), 4.0, vj.view(), offsets, 0.1, 1.0)).abs() < 1e-12);
            assert!((gb - eta * grad_b(ui.view(), 4.0, vj.view(), offsets, 0.1, 1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn sgd_step_is_sequentially_coupled() {
        let mut model = BiasedFactorization::from_parts(
            array![[1.0]],
            array![[1.0]],
            array![0.0],
            array![0.0],
            1.0,
        )
        .unwrap();
        let optimizer = GradientDescent::new(0.5, 0.0);

        model.sgd_step(&Rating::new(0, 0, 4.0), &optimizer);

        // r = 4 - 1 - 1 = 2          -> U = 1 + 0.5 * 1 * 2 = 2
        // r = 4 - 1 - 2 = 1          -> V = 1 + 0.5 * 2 * 1 = 2
        // r = 4 - 1 - 4 = -1         -> a = 0 + 0.5 * -1 = -0.5
        // r = 4 - 1 - 4 + 0.5 = -0.5 -> b = 0 + 0.5 * -0.5 = -0.25
        assert_eq!(model.users()[[0, 0]], 2.0);
        assert_eq!(model.items()[[0, 0]], 2.0);
        assert_eq!(model.user_biases()[0], -0.5);
        assert_eq!(model.item_biases()[0], -0.25);
    }
}
