use std::fs;

use movielens::{
    DataConfig, FilmGroup, Genre, Rating, add_missing_ratings, load_data, load_movies,
    load_test_data, load_train_data, shape,
};
use tempfile::TempDir;

fn genre_flags(genre: usize) -> String {
    (0..19)
        .map(|i| if i == genre { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join("\t")
}

fn write_dataset(dir: &TempDir) -> DataConfig {
    let config = DataConfig::from_dir(dir.path());

    fs::write(&config.train_path, "1\t1\t5\n1\t2\t3\n2\t1\t4\n").unwrap();
    fs::write(&config.test_path, "2\t2\t2\n").unwrap();
    fs::write(&config.data_path, "1\t1\t5\n1\t2\t3\n2\t1\t4\n2\t2\t2\n").unwrap();

    let movies = format!(
        "1\tStar Wars (1977)\t{}\n2\tFargo (1996)\t{}\n3\tNobody Saw This (1990)\t{}\n",
        genre_flags(15),
        genre_flags(6),
        genre_flags(8),
    );
    fs::write(&config.movies_path, movies).unwrap();

    config
}

#[test]
fn one_based_files_load_as_zero_based_indices() {
    let dir = TempDir::new().unwrap();
    let config = write_dataset(&dir);

    let train = load_train_data(&config).unwrap();
    let test = load_test_data(&config).unwrap();
    let all = load_data(&config).unwrap();

    assert_eq!(train[0], Rating::new(0, 0, 5.0));
    assert_eq!(test, vec![Rating::new(1, 1, 2.0)]);
    assert_eq!(all.len(), train.len() + test.len());
    assert_eq!(all.iter().map(|r| r.user).min(), Some(0));
    assert_eq!(all.iter().map(|r| r.item).min(), Some(0));
    assert_eq!(shape(&all), (2, 2));
}

#[test]
fn unrated_movies_get_a_rating_from_a_new_user() {
    let dir = TempDir::new().unwrap();
    let config = write_dataset(&dir);

    let mut train = load_train_data(&config).unwrap();
    let movies = load_movies(&config).unwrap();
    let every_movie: Vec<usize> = movies.iter().map(|m| m.index).collect();

    let added = add_missing_ratings(&mut train, &every_movie, None);

    assert_eq!(added, 1);
    assert_eq!(train.last(), Some(&Rating::new(2, 2, 2.5)));
    assert_eq!(shape(&train), (3, 3));
    assert_eq!(movies.with_genre(Genre::SciFi), vec![0]);
}

#[test]
fn config_roundtrips_through_json() {
    let dir = TempDir::new().unwrap();
    let config = write_dataset(&dir);
    let path = dir.path().join("data.json");
    fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    assert_eq!(DataConfig::from_json_file(&path).unwrap(), config);
}

#[test]
fn film_groups_are_exposed_by_name() {
    assert_eq!(FilmGroup::Popular.indices()[7], 0);
    assert_eq!(FilmGroup::SciFi.slug(), "sci_fi");
}
