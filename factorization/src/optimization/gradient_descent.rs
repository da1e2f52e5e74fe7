use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Stochastic gradient descent over a squared-error loss with an L2 penalty.
///
/// Every step is already scaled by the learning rate, so applying it is a plain
/// subtraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    learning_rate: f64,
    reg: f64,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken (`eta`).
    /// * `reg` - The L2 regularization strength (`lambda`).
    pub fn new(learning_rate: f64, reg: f64) -> Self {
        Self { learning_rate, reg }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn reg(&self) -> f64 {
        self.reg
    }

    /// The step for a latent vector `x` paired with `other` in the prediction:
    /// `eta * (reg * x - other * residual)`.
    ///
    /// # Arguments
    /// * `x` - The latent vector being updated.
    /// * `other` - The latent vector it is multiplied with in the prediction.
    /// * `residual` - The observed rating minus the current prediction.
    pub fn latent_step(
        &self,
        x: ArrayView1<f64>,
        other: ArrayView1<f64>,
        residual: f64,
    ) -> Array1<f64> {
        (&x * self.reg - &other * residual) * self.learning_rate
    }

    /// The step for a scalar offset `x`: `eta * (reg * x - residual)`.
    pub fn offset_step(&self, x: f64, residual: f64) -> f64 {
        self.learning_rate * (self.reg * x - residual)
    }

    /// Moves `params` against `step`.
    pub fn update_params(&self, mut params: ArrayViewMut1<f64>, step: &Array1<f64>) {
        params -= step;
    }
}
