use nalgebra::{DMatrix, SVD};
use ndarray::{Array2, ArrayView2};

use crate::{ProjectionErr, Result};

const COMPONENTS: usize = 2;
const MAX_SVD_ITERATIONS: usize = 10_000;

/// Projects every row of the `items x latent_dim` matrix `items` onto the plane
/// that best explains it.
///
/// Takes the SVD `items^T = A S B^T`, keeps the two columns of `A` with the largest
/// singular values as `A2` and returns `(A2^T items^T)^T`, one `(x, y)` row per item.
/// The sign of each axis is arbitrary.
///
/// # Errors
/// `TooFewComponents` if either dimension of `items` is below 2 and
/// `Decomposition` if `items` is not finite or the SVD does not converge.
pub fn project(items: ArrayView2<f64>) -> Result<Array2<f64>> {
    let (num_items, latent_dim) = items.dim();
    let components = num_items.min(latent_dim);

    if components < COMPONENTS {
        return Err(ProjectionErr::TooFewComponents { got: components });
    }

    if items.iter().any(|x| !x.is_finite()) {
        return Err(ProjectionErr::Decomposition);
    }

    let items_t = DMatrix::from_fn(latent_dim, num_items, |r, c| items[[c, r]]);
    let svd = SVD::try_new(items_t.clone(), true, false, f64::EPSILON, MAX_SVD_ITERATIONS)
        .ok_or(ProjectionErr::Decomposition)?;
    let u = svd.u.ok_or(ProjectionErr::Decomposition)?;

    let singular_values = &svd.singular_values;
    let mut order: Vec<usize> = (0..singular_values.len()).collect();
    order.sort_by(|&a, &b| singular_values[b].total_cmp(&singular_values[a]));

    let basis = u.select_columns(&order[..COMPONENTS]);
    let projected = basis.transpose() * items_t;

    Ok(Array2::from_shape_fn((num_items, COMPONENTS), |(i, c)| {
        projected[(c, i)]
    }))
}

#[cfg(test)]
mod tests {
    use ndarray::{Axis, array};

    use super::*;

    fn row_norms(a: ArrayView2<f64>) -> Vec<f64> {
        a.axis_iter(Axis(0))
            .map(|row| row.dot(&row).sqrt())
            .collect()
    }

    #[test]
    fn needs_two_components() {
        let items = array![[1.0], [2.0], [3.0]];
        assert_eq!(
            project(items.view()).unwrap_err(),
            ProjectionErr::TooFewComponents { got: 1 }
        );

        let items = array![[1.0, 2.0, 3.0]];
        assert_eq!(
            project(items.view()).unwrap_err(),
            ProjectionErr::TooFewComponents { got: 1 }
        );
    }

    #[test]
    fn rejects_non_finite_items() {
        let items = array![[1.0, f64::NAN], [2.0, 3.0]];
        assert_eq!(
            project(items.view()).unwrap_err(),
            ProjectionErr::Decomposition
        );
    }

    #[test]
    fn planar_items_keep_their_norms() {
        // every row lies in the plane spanned by (1, 1, 0) and (0, 0, 1)
        let items = array![
            [1.0, 1.0, 2.0],
            [-0.5, -0.5, 1.0],
            [2.0, 2.0, 0.0],
            [0.0, 0.0, -3.0],
        ];

        let points = project(items.view()).unwrap();

        assert_eq!(points.dim(), (4, 2));
        for (got, expected) in row_norms(points.view()).iter().zip(row_norms(items.view())) {
            assert!((got - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn first_axis_follows_the_largest_spread() {
        let items = array![
            [3.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-3.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
        ];

        let points = project(items.view()).unwrap();

        let expected = [[3.0, 0.0], [0.0, 1.0], [3.0, 0.0], [0.0, 1.0]];
        for (row, expected) in points.axis_iter(Axis(0)).zip(expected) {
            assert!((row[0].abs() - expected[0]).abs() < 1e-9);
            assert!((row[1].abs() - expected[1]).abs() < 1e-9);
        }
    }
}
