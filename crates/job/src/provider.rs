//! Owns the job's single data model.

use crate::error::{JobError, Result};
use crate::registry::ComponentRegistry;
use conf::{keys, Configuration};
use data_model::{DataModel, RandomSource};
use tracing::{debug, info};

/// Constructs the data model on first use and rebuilds it for every fold.
///
/// The random source lives here so every build draws from the same stream.
pub struct DataModelProvider {
    model: Option<Box<dyn DataModel>>,
    random: RandomSource,
}

impl DataModelProvider {
    pub fn new(random: RandomSource) -> Self {
        Self {
            model: None,
            random,
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.model.is_some()
    }

    /// Builds the data model for the fold described by `conf`.
    ///
    /// The model type is read from `data.model.format` the first time only;
    /// later folds reuse the same instance.
    pub fn ensure_built(
        &mut self,
        registry: &ComponentRegistry,
        conf: &Configuration,
    ) -> Result<&dyn DataModel> {
        let model = match self.model {
            Some(ref mut model) => model,
            None => {
                let format = conf.require(keys::DATA_MODEL_FORMAT)?;
                info!("Constructing data model '{}'", format);
                self.model.insert(registry.create_data_model(format, conf)?)
            }
        };

        model
            .build_data_model(conf, &mut self.random)
            .map_err(|reason| JobError::Build {
                stage: "data model",
                reason,
            })?;

        let (users, items, ratings) = model.train_set().counts();
        debug!(
            "Data model built: {} users, {} items, {} training ratings",
            users, items, ratings
        );
        Ok(&**model)
    }
}
