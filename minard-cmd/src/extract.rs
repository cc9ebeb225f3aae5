//! Write one shaped dataset as CSV.

use crate::pipeline::{load_table, Datasets};
use anyhow::Context;
use clap::ValueEnum;
use log::info;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dataset {
    /// City label positions
    Cities,
    /// Temperature readings with their date labels
    Temperatures,
    /// Troop positions in draw order
    Army,
}

fn write_records<T: Serialize, W: Write>(records: &[T], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serialise the chosen dataset, with a header row, into `writer`.
pub fn write_dataset<W: Write>(
    datasets: &Datasets,
    dataset: Dataset,
    writer: W,
) -> anyhow::Result<usize> {
    match dataset {
        Dataset::Cities => write_records(&datasets.cities, writer)?,
        Dataset::Temperatures => write_records(&datasets.temperatures, writer)?,
        Dataset::Army => write_records(&datasets.army, writer)?,
    }
    Ok(match dataset {
        Dataset::Cities => datasets.cities.len(),
        Dataset::Temperatures => datasets.temperatures.len(),
        Dataset::Army => datasets.army.len(),
    })
}

/// Extract one dataset and write it to `output`, or stdout when absent.
pub fn run_extract(
    input: &str,
    dataset: Dataset,
    output: Option<&str>,
    schema: Option<&str>,
) -> anyhow::Result<()> {
    let table = load_table(input, schema)?;
    let datasets = Datasets::extract(&table).context("Failed to shape the campaign table")?;

    let count = match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path))?;
            write_dataset(&datasets, dataset, file)?
        }
        None => write_dataset(&datasets, dataset, std::io::stdout().lock())?,
    };
    info!(
        "Wrote {} {:?} records to {}",
        count,
        dataset,
        output.unwrap_or("stdout")
    );
    Ok(())
}
