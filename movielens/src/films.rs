//! Hand-picked zero-based movie indices of the MovieLens 100K movies file.

/// The 10 most rated movies.
pub const POPULAR: [usize; 10] = [49, 257, 99, 180, 293, 285, 287, 0, 299, 120];

/// The 10 movies with the highest mean rating.
pub const HIGHEST_RATED: [usize; 10] = [813, 1598, 1200, 1121, 1652, 1292, 1499, 1188, 1535, 1466];

pub const DOCUMENTARY: [usize; 10] = [1307, 1585, 857, 701, 1363, 973, 1561, 1128, 954, 1629];

pub const SCI_FI: [usize; 10] = [6, 38, 95, 182, 830, 1471, 1595, 559, 221, 234];

pub const COMEDY: [usize; 10] = [234, 708, 1501, 516, 121, 1451, 485, 258, 794, 1269];

pub const ACTION: [usize; 10] = [1, 95, 127, 143, 173, 194, 209, 299, 404, 1138];

/// 10 movies picked at random once.
pub const RANDOM: [usize; 10] = [20, 70, 93, 157, 176, 195, 379, 402, 699, 754];

/// A named list of movies worth plotting together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilmGroup {
    Popular,
    HighestRated,
    Documentary,
    SciFi,
    Comedy,
    Action,
    Random,
}

impl FilmGroup {
    pub const ALL: [FilmGroup; 7] = [
        FilmGroup::Popular,
        FilmGroup::HighestRated,
        FilmGroup::Documentary,
        FilmGroup::SciFi,
        FilmGroup::Comedy,
        FilmGroup::Action,
        FilmGroup::Random,
    ];

    pub fn indices(&self) -> &'static [usize] {
        match self {
            FilmGroup::Popular => &POPULAR,
            FilmGroup::HighestRated => &HIGHEST_RATED,
            FilmGroup::Documentary => &DOCUMENTARY,
            FilmGroup::SciFi => &SCI_FI,
            FilmGroup::Comedy => &COMEDY,
            FilmGroup::Action => &ACTION,
            FilmGroup::Random => &RANDOM,
        }
    }

    /// Returns a human readable name, used as plot title.
    pub fn display_name(&self) -> &'static str {
        match self {
            FilmGroup::Popular => "Most popular movies",
            FilmGroup::HighestRated => "Highest rated movies",
            FilmGroup::Documentary => "Documentaries",
            FilmGroup::SciFi => "Sci-fi movies",
            FilmGroup::Comedy => "Comedies",
            FilmGroup::Action => "Action movies",
            FilmGroup::Random => "Random movies",
        }
    }

    /// Returns a short name fit for file names.
    pub fn slug(&self) -> &'static str {
        match self {
            FilmGroup::Popular => "popular",
            FilmGroup::HighestRated => "highest_rated",
            FilmGroup::Documentary => "documentary",
            FilmGroup::SciFi => "sci_fi",
            FilmGroup::Comedy => "comedy",
            FilmGroup::Action => "action",
            FilmGroup::Random => "random",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_group_holds_ten_distinct_movies() {
        for group in FilmGroup::ALL {
            let unique: HashSet<_> = group.indices().iter().collect();
            assert_eq!(unique.len(), 10, "{}", group.slug());
        }
    }

    #[test]
    fn indices_fit_the_100k_movies_file() {
        // the 100K movies file lists 1682 movies
        let max = FilmGroup::ALL
            .iter()
            .flat_map(|g| g.indices().iter().copied())
            .max();

        assert!(max.is_some_and(|max| max < 1682));
    }
}
