use ndarray::{Array2, ArrayBase, Data, Dimension};
use rand::Rng;

use crate::{FactorizationErr, Rating, Result, optimization::GradientDescent};

/// A latent factorization of a ratings matrix.
///
/// Implementors decide which terms make up a prediction and how a single rating
/// moves their parameters. The training loop, the loss and the stopping rule are
/// shared by every variant.
pub trait Factorization {
    /// Returns `(users, items, latent_dim)`.
    fn dims(&self) -> (usize, usize, usize);

    /// Returns the estimated rating of `item` by `user`.
    ///
    /// Indices are expected to be in range, see `check_bounds`.
    fn predict(&self, user: usize, item: usize) -> f64;

    /// Returns the sum of the squared entries of every regularized parameter.
    fn penalty(&self) -> f64;

    /// Performs one stochastic gradient descent step on a single rating, updating
    /// the parameters touched by it **in place and in sequence**: each update sees
    /// the values written by the ones before it.
    ///
    /// # Arguments
    /// * `rating` - The observed rating.
    /// * `optimizer` - Holds the learning rate and the regularization strength.
    fn sgd_step(&mut self, rating: &Rating, optimizer: &GradientDescent);
}

/// Checks that every rating references a user and an item present in `model`.
///
/// # Returns
/// An `IndexOutOfRange` error for the first offending rating.
pub fn check_bounds<F: Factorization + ?Sized>(model: &F, ratings: &[Rating]) -> Result<()> {
    let (users, items, _) = model.dims();

    for rating in ratings {
        if rating.user >= users {
            return Err(FactorizationErr::IndexOutOfRange {
                what: "user",
                index: rating.user,
                bound: users,
            });
        }

        if rating.item >= items {
            return Err(FactorizationErr::IndexOutOfRange {
                what: "item",
                index: rating.item,
                bound: items,
            });
        }
    }

    Ok(())
}

/// Computes the regularized squared error of `model` over `ratings`:
/// `0.5 * sum((y - y_hat)^2) + reg / 2 * penalty`.
///
/// With `reg = 0` this is the unregularized error reported after training.
///
/// # Errors
/// `IndexOutOfRange` if any rating falls outside of the model.
pub fn loss<F: Factorization + ?Sized>(model: &F, ratings: &[Rating], reg: f64) -> Result<f64> {
    check_bounds(model, ratings)?;

    let squared_error: f64 = ratings
        .iter()
        .map(|r| (r.value - model.predict(r.user, r.item)).powi(2))
        .sum();

    Ok(0.5 * squared_error + reg / 2.0 * model.penalty())
}

/// Sum of the squared entries of `a` (the squared Frobenius norm for matrices).
pub(crate) fn squared_norm<S, D>(a: &ArrayBase<S, D>) -> f64
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    a.iter().map(|x| x * x).sum()
}

/// A `rows x latent_dim` matrix with entries drawn uniformly from `[-0.5, 0.5)`.
pub(crate) fn init_latent<R: Rng>(rows: usize, latent_dim: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn((rows, latent_dim), || rng.random::<f64>() - 0.5)
}

pub(crate) fn check_dim(what: &'static str, got: usize) -> Result<()> {
    if got == 0 {
        return Err(FactorizationErr::InvalidDimension { what, got });
    }

    Ok(())
}
