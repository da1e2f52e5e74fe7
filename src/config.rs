use std::{env, fs, path::PathBuf};

use anyhow::{Context, ensure};
use factorization::training::TrainerBuilder;
use log::info;
use serde::{Deserialize, Serialize};

/// Env var holding the run config path when none is given as argument.
pub const CONFIG_ENV: &str = "RUN_CONFIG";

/// The projection plots need at least two latent dimensions.
pub const MIN_LATENT_DIM: usize = 2;

/// Which factorization to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Plain,
    Biased,
}

/// Everything a run needs. Missing JSON fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Holds `train.txt`, `test.txt` and `movies.txt`.
    pub data_dir: PathBuf,
    /// Where the projection plots are written.
    pub output_dir: PathBuf,
    pub model: ModelKind,
    pub latent_dim: usize,
    pub eta: f64,
    pub reg: f64,
    pub eps: f64,
    pub max_epochs: usize,
    /// Seeds initialization and shuffling, OS-seeded if absent.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("plots"),
            model: ModelKind::default(),
            latent_dim: 20,
            eta: 0.03,
            reg: 0.1,
            eps: 1e-4,
            max_epochs: 300,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Loads the config from the path given as first argument, or else from the
    /// one in `RUN_CONFIG`, falling back to the defaults if there is neither.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok());

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                info!("no run config given, using the defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read '{path}'"))?;

        serde_json::from_str(&content).with_context(|| format!("invalid run config '{path}'"))
    }

    /// Checks that the trained item factors can be plotted, before any data is
    /// loaded or trained on.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.latent_dim >= MIN_LATENT_DIM,
            "latent_dim must be at least {MIN_LATENT_DIM} to plot the projection, got {}",
            self.latent_dim
        );

        Ok(())
    }

    /// Returns a `TrainerBuilder` carrying this run's hyperparameters.
    pub fn trainer_builder(&self) -> TrainerBuilder {
        let builder = TrainerBuilder::new()
            .learning_rate(self.eta)
            .reg(self.reg)
            .eps(self.eps)
            .max_epochs(self.max_epochs);

        match self.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
    }
}
