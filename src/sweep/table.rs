use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::sweep::harness::ResultRow;

/// Sweep results, one row per configuration in the order they were given.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row with the lowest finite loss; the earliest wins ties. `None` if
    /// every run diverged.
    pub fn best(&self) -> Option<&ResultRow> {
        self.rows.iter()
            .filter(|r| !r.diverged())
            .fold(None, |best: Option<&ResultRow>, r| match best {
                Some(b) if b.final_loss <= r.final_loss => Some(b),
                _ => Some(r),
            })
    }

    /// Serializes the table to a pretty-printed JSON file. Non-finite losses
    /// are written as `null`.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a table written by `save_json`. A `null` loss comes back as NaN,
    /// so the row still reports `diverged()`.
    pub fn load_json(path: &str) -> Result<ResultTable> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>14}  {:>11}  {:>12}", "learning_rate", "hidden_size", "final_loss")?;
        for row in &self.rows {
            if row.diverged() {
                writeln!(
                    f,
                    "{:>14}  {:>11}  {:>12}  diverged",
                    row.learning_rate, row.hidden_size, row.final_loss
                )?;
            } else {
                writeln!(
                    f,
                    "{:>14}  {:>11}  {:>12.6}",
                    row.learning_rate, row.hidden_size, row.final_loss
                )?;
            }
        }
        Ok(())
    }
}
