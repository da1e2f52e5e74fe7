use std::{
    collections::{BTreeSet, HashSet},
    fs::File,
    path::Path,
    str::{self, FromStr},
};

use csv::{ByteRecord, Reader, ReaderBuilder};
use log::{debug, info};

use crate::{DataConfig, DataErr, Rating, Result};

/// The rating given to movies nobody rated, see `add_missing_ratings`.
pub const MISSING_RATING: f64 = 2.5;

const RATING_FIELDS: usize = 3;

/// Loads every rating, train and test together.
pub fn load_data(config: &DataConfig) -> Result<Vec<Rating>> {
    load_ratings(&config.data_path)
}

pub fn load_train_data(config: &DataConfig) -> Result<Vec<Rating>> {
    load_ratings(&config.train_path)
}

pub fn load_test_data(config: &DataConfig) -> Result<Vec<Rating>> {
    load_ratings(&config.test_path)
}

/// Loads a header-less, tab-delimited `user_id movie_id rating` file.
///
/// Ids in the file are 1-based and are shifted down by one, so the returned
/// ratings index users and movies from zero.
///
/// # Errors
/// `Io` if the file cannot be opened and `Malformed` for the first row with the
/// wrong amount of fields, a non-numeric field or an id of zero.
pub fn load_ratings<P: AsRef<Path>>(path: P) -> Result<Vec<Rating>> {
    let path = path.as_ref();
    let mut ratings = Vec::new();

    for_each_row(path, |record| {
        ratings.push(parse_rating(record)?);
        Ok(())
    })?;

    info!("loaded {} ratings from {}", ratings.len(), path.display());
    Ok(ratings)
}

/// Adds a single rating of `MISSING_RATING` for every movie in `movie_indices`
/// that nobody rated, so that every listed movie gets trained.
///
/// # Arguments
/// * `ratings` - The ratings to complete.
/// * `movie_indices` - The zero-based movies that must be rated.
/// * `user` - The user making the ratings, defaults to the next unused user index.
///
/// # Returns
/// The amount of ratings added.
pub fn add_missing_ratings(
    ratings: &mut Vec<Rating>,
    movie_indices: &[usize],
    user: Option<usize>,
) -> usize {
    let user = user.unwrap_or_else(|| ratings.iter().map(|r| r.user + 1).max().unwrap_or(0));

    let rated: HashSet<usize> = ratings.iter().map(|r| r.item).collect();
    let missing: BTreeSet<usize> = movie_indices
        .iter()
        .copied()
        .filter(|item| !rated.contains(item))
        .collect();

    ratings.extend(
        missing
            .iter()
            .map(|&item| Rating::new(user, item, MISSING_RATING)),
    );

    if !missing.is_empty() {
        debug!(user = user, added = missing.len(); "added missing ratings");
    }

    missing.len()
}

/// Runs `f` over every row of a header-less, tab-delimited file.
///
/// Quoting is disabled since titles may hold unbalanced quotes. Any error
/// message returned by `f` is reported as `Malformed` at the row's line.
pub(crate) fn for_each_row<F>(path: &Path, mut f: F) -> Result<()>
where
    F: FnMut(&ByteRecord) -> std::result::Result<(), String>,
{
    let mut reader = open_tsv(path)?;
    let mut record = ByteRecord::new();

    loop {
        let more = reader.read_byte_record(&mut record).map_err(|source| DataErr::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        if !more {
            return Ok(());
        }

        f(&record).map_err(|reason| DataErr::Malformed {
            path: path.to_path_buf(),
            line: record.position().map_or(0, |p| p.line()),
            reason,
        })?;
    }
}

fn open_tsv(path: &Path) -> Result<Reader<File>> {
    let file = File::open(path).map_err(|source| DataErr::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(file))
}

fn parse_rating(record: &ByteRecord) -> std::result::Result<Rating, String> {
    if record.len() != RATING_FIELDS {
        return Err(format!(
            "expected {RATING_FIELDS} fields, got {}",
            record.len()
        ));
    }

    let user = parse_id(&record[0], "user id")?;
    let item = parse_id(&record[1], "movie id")?;
    let value: f64 = parse_field(&record[2], "rating")?;

    if !value.is_finite() {
        return Err(format!("rating is not finite: {value}"));
    }

    Ok(Rating::new(user, item, value))
}

/// Parses a 1-based id into a zero-based index.
pub(crate) fn parse_id(field: &[u8], what: &str) -> std::result::Result<usize, String> {
    let id: usize = parse_field(field, what)?;
    id.checked_sub(1)
        .ok_or_else(|| format!("{what} must be 1-based, got 0"))
}

pub(crate) fn parse_field<T: FromStr>(field: &[u8], what: &str) -> std::result::Result<T, String> {
    str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            format!(
                "{what} is not a number: '{}'",
                String::from_utf8_lossy(field)
            )
        })
}
