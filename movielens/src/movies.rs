use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    path::Path,
};

use csv::ByteRecord;
use log::info;

use crate::{
    DataConfig, Result,
    loader::{for_each_row, parse_field, parse_id},
};

/// A MovieLens genre, in the order of the genre flags in the movies file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genre {
    Unknown,
    Action,
    Adventure,
    Animation,
    Childrens,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    FilmNoir,
    Horror,
    Musical,
    Mystery,
    Romance,
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    pub const ALL: [Genre; 19] = [
        Genre::Unknown,
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Childrens,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Unknown => "unknown",
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::Animation => "animation",
            Genre::Childrens => "childrens",
            Genre::Comedy => "comedy",
            Genre::Crime => "crime",
            Genre::Documentary => "documentary",
            Genre::Drama => "drama",
            Genre::Fantasy => "fantasy",
            Genre::FilmNoir => "film noir",
            Genre::Horror => "horror",
            Genre::Musical => "musical",
            Genre::Mystery => "mystery",
            Genre::Romance => "romance",
            Genre::SciFi => "sci-fi",
            Genre::Thriller => "thriller",
            Genre::War => "war",
            Genre::Western => "western",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A row of the movies file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// The zero-based movie index, matching `Rating::item`.
    pub index: usize,
    pub title: String,
    pub genres: Vec<Genre>,
}

impl Movie {
    pub fn has_genre(&self, genre: Genre) -> bool {
        self.genres.contains(&genre)
    }
}

/// Every movie keyed by its zero-based index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieTable {
    movies: BTreeMap<usize, Movie>,
}

impl MovieTable {
    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(&index)
    }

    /// Returns the title of the movie at `index`, if any.
    pub fn title(&self, index: usize) -> Option<&str> {
        self.get(index).map(|m| m.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Iterates the movies by increasing index.
    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// Returns the indices of every movie tagged with `genre`.
    pub fn with_genre(&self, genre: Genre) -> Vec<usize> {
        self.iter()
            .filter(|m| m.has_genre(genre))
            .map(|m| m.index)
            .collect()
    }
}

impl FromIterator<Movie> for MovieTable {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        Self {
            movies: iter.into_iter().map(|m| (m.index, m)).collect(),
        }
    }
}

/// Loads the movies file pointed at by `config`.
pub fn load_movies(config: &DataConfig) -> Result<MovieTable> {
    load_movie_table(&config.movies_path)
}

/// Loads a header-less, tab-delimited `movie_id title flags...` file with one
/// `0`/`1` flag per `Genre`.
///
/// Titles are decoded lossily since the files predate UTF-8.
///
/// # Errors
/// `Io` if the file cannot be opened and `Malformed` for the first row that does
/// not have a 1-based id, a title and 19 genre flags.
pub fn load_movie_table<P: AsRef<Path>>(path: P) -> Result<MovieTable> {
    let path = path.as_ref();
    let mut movies = Vec::new();

    for_each_row(path, |record| {
        movies.push(parse_movie(record)?);
        Ok(())
    })?;

    let table: MovieTable = movies.into_iter().collect();
    info!("loaded {} movies from {}", table.len(), path.display());

    Ok(table)
}

fn parse_movie(record: &ByteRecord) -> std::result::Result<Movie, String> {
    let expected = 2 + Genre::ALL.len();
    if record.len() != expected {
        return Err(format!("expected {expected} fields, got {}", record.len()));
    }

    let index = parse_id(&record[0], "movie id")?;
    let title = String::from_utf8_lossy(&record[1]).trim().to_string();

    let mut genres = Vec::new();
    for (genre, field) in Genre::ALL.iter().zip(record.iter().skip(2)) {
        match parse_field::<u8>(field, genre.name())? {
            0 => {}
            1 => genres.push(*genre),
            flag => return Err(format!("{genre} flag must be 0 or 1, got {flag}")),
        }
    }

    Ok(Movie {
        index,
        title,
        genres,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::DataErr;

    fn flags(set: &[usize]) -> String {
        (0..19)
            .map(|i| if set.contains(&i) { "1" } else { "0" })
            .collect::<Vec<_>>()
            .join("\t")
    }

    #[test]
    fn loads_titles_and_genres() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1\tToy Story (1995)\t{}", flags(&[3, 4, 5])).unwrap();
        writeln!(file, "2\t\"Twelve Monkeys (1995)\t{}", flags(&[15])).unwrap();

        let table = load_movie_table(file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.title(0), Some("Toy Story (1995)"));
        assert_eq!(
            table.get(0).unwrap().genres,
            vec![Genre::Animation, Genre::Childrens, Genre::Comedy]
        );
        assert_eq!(table.title(1), Some("\"Twelve Monkeys (1995)"));
        assert_eq!(table.with_genre(Genre::SciFi), vec![1]);
        assert_eq!(table.title(2), None);
    }

    #[test]
    fn decodes_legacy_titles_lossily() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"1\tCaf\xe9 (1990)\t").unwrap();
        file.write_all(flags(&[]).as_bytes()).unwrap();

        let table = load_movie_table(file.path()).unwrap();

        assert_eq!(table.title(0), Some("Caf\u{FFFD} (1990)"));
    }

    #[test]
    fn missing_flags_are_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1\tToy Story (1995)\t0\t1").unwrap();

        let err = load_movie_table(file.path()).unwrap_err();

        assert!(matches!(err, DataErr::Malformed { line: 1, .. }));
    }
}
