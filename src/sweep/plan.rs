use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::sweep::harness::{HyperparameterConfig, SweepOptions};
use crate::train::DEFAULT_SEED;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// A fully serializable description of a sweep: the configurations to try
/// plus the settings shared by all of them.
///
/// Plans can be saved to / loaded from JSON so a sweep can be rerun
/// unchanged later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Epochs of full-batch training per configuration.
    pub epochs: usize,
    /// Seed for every configuration's initial parameters.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Train on only the first `subset` rows of the dataset, if set.
    #[serde(default)]
    pub subset: Option<usize>,
    #[serde(default)]
    pub parallel: bool,
    /// Ordered list of configurations; results come back in this order.
    pub configs: Vec<HyperparameterConfig>,
}

impl SweepPlan {
    pub fn options(&self) -> SweepOptions {
        SweepOptions {
            epochs: self.epochs,
            seed: self.seed,
            parallel: self.parallel,
        }
    }

    /// Serializes the plan to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `SweepPlan` from a JSON file.
    pub fn load_json(path: &str) -> Result<SweepPlan> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for SweepPlan {
    fn default() -> Self {
        SweepPlan {
            epochs: 100,
            seed: DEFAULT_SEED,
            subset: Some(1000),
            parallel: false,
            configs: HyperparameterConfig::grid(&[0.1, 0.01, 0.001], &[32, 64, 128]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_nine_entries() {
        let plan = SweepPlan::default();
        assert_eq!(plan.configs.len(), 9);
        assert_eq!(plan.configs[0], HyperparameterConfig::new(0.1, 32));
        assert_eq!(plan.configs[8], HyperparameterConfig::new(0.001, 128));
    }

    #[test]
    fn minimal_json_fills_in_defaults() {
        let json = r#"{
            "epochs": 20,
            "configs": [
                { "learning_rate": 0.05, "hidden_size": 16 },
                { "learning_rate": 0.5, "hidden_size": 4 }
            ]
        }"#;
        let plan: SweepPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.seed, DEFAULT_SEED);
        assert_eq!(plan.subset, None);
        assert!(!plan.parallel);
        assert_eq!(plan.options().epochs, 20);
        assert_eq!(plan.configs[1], HyperparameterConfig::new(0.5, 4));
    }
}
