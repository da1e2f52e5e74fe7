/// A single explicit rating: user `user` gave item `item` the score `value`.
///
/// Both indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub user: usize,
    pub item: usize,
    pub value: f64,
}

impl Rating {
    /// Creates a new `Rating`.
    ///
    /// # Arguments
    /// * `user` - The zero-based user index.
    /// * `item` - The zero-based item index.
    /// * `value` - The observed rating.
    pub fn new(user: usize, item: usize, value: f64) -> Self {
        Self { user, item, value }
    }
}

impl From<(usize, usize, f64)> for Rating {
    fn from((user, item, value): (usize, usize, f64)) -> Self {
        Self::new(user, item, value)
    }
}

/// Returns the mean rating value of `ratings`, or `0.0` if there are none.
pub fn mean_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    ratings.iter().map(|r| r.value).sum::<f64>() / ratings.len() as f64
}

/// Returns the smallest `(users, items)` shape able to hold every rating.
pub fn shape(ratings: &[Rating]) -> (usize, usize) {
    ratings.iter().fold((0, 0), |(m, n), r| {
        (m.max(r.user + 1), n.max(r.item + 1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean_rating(&[]), 0.0);
    }

    #[test]
    fn mean_and_shape() {
        let ratings: Vec<Rating> = vec![(0, 3, 4.0).into(), (2, 1, 2.0).into()];

        assert_eq!(mean_rating(&ratings), 3.0);
        assert_eq!(shape(&ratings), (3, 4));
    }
}
