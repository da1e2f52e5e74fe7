mod config;

use std::fs;

use anyhow::Context;
use factorization::{
    Rating,
    arch::{Factorization, loss},
    training::Trained,
};
use log::info;
use movielens::{
    DataConfig, FilmGroup, add_missing_ratings, load_movies, load_test_data, load_train_data,
    shape,
};
use projection::plot_projection;

use config::{ModelKind, RunConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RunConfig::load()?;
    config.validate()?;
    info!("running with {config:?}");

    let data = DataConfig::from_dir(&config.data_dir);
    let mut train = load_train_data(&data).context("cannot load the train ratings")?;
    let test = load_test_data(&data).context("cannot load the test ratings")?;
    let movies = load_movies(&data).context("cannot load the movies")?;

    // every movie gets at least one rating so that it is trained and plottable
    let every_movie: Vec<usize> = movies
        .iter()
        .map(|m| m.index)
        .chain(FilmGroup::ALL.iter().flat_map(|g| g.indices().iter().copied()))
        .collect();
    let added = add_missing_ratings(&mut train, &every_movie, None);
    info!("added {added} placeholder ratings");

    let (train_users, train_items) = shape(&train);
    let (test_users, test_items) = shape(&test);
    let users = train_users.max(test_users);
    let items = train_items.max(test_items);

    let mut trainer = config.trainer_builder().build()?;
    let item_factors = match config.model {
        ModelKind::Plain => {
            let trained = trainer.train_plain(users, items, config.latent_dim, &train)?;
            report(&trained, &test)?;
            trained.into_model().into_parts().1
        }
        ModelKind::Biased => {
            let trained = trainer.train_biased(users, items, config.latent_dim, &train)?;
            report(&trained, &test)?;
            trained.into_model().into_parts().1
        }
    };

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("cannot create '{}'", config.output_dir.display()))?;

    for group in FilmGroup::ALL {
        let output = config.output_dir.join(format!("{}.svg", group.slug()));

        plot_projection(
            item_factors.view(),
            &movies,
            group.indices(),
            group.display_name(),
            &output,
        )
        .with_context(|| format!("cannot plot {}", group.slug()))?;
    }

    Ok(())
}

/// Logs the train and test errors of `trained`, both as totals and per rating.
fn report<F: Factorization>(trained: &Trained<F>, test: &[Rating]) -> anyhow::Result<()> {
    let test_error = loss(trained.model(), test, 0.0)?;

    info!(
        "trained for {} epoch(s) ({:?}): train error {:.4}, test error {:.4} ({:.4} per rating)",
        trained.epochs(),
        trained.stop_reason(),
        trained.error(),
        test_error,
        test_error / test.len().max(1) as f64,
    );

    Ok(())
}
