//! Command implementations for the Minard CLI.
//!
//! Provides subcommands for rendering the campaign chart and for dumping
//! the shaped datasets it is built from.

use clap::Subcommand;

pub mod extract;
pub mod pipeline;
pub mod render;

pub use extract::Dataset;

#[derive(Subcommand)]
pub enum Command {
    /// Render the two-panel campaign chart as SVG
    Render {
        /// Path to the campaign CSV
        #[arg(short = 'i', long, default_value = "minard-data.csv")]
        input: String,

        /// Output path for the SVG chart
        #[arg(short = 'o', long, default_value = "minard.svg")]
        output: String,

        /// Also write the chart as a Vega-Lite JSON specification
        #[arg(long)]
        vega_lite: Option<String>,

        /// JSON file overriding the source column names
        #[arg(long)]
        schema: Option<String>,
    },

    /// Write one shaped dataset as CSV
    Extract {
        /// Path to the campaign CSV
        #[arg(short = 'i', long, default_value = "minard-data.csv")]
        input: String,

        /// Dataset to write
        #[arg(short = 'd', long, value_enum)]
        dataset: Dataset,

        /// Output path for the CSV (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// JSON file overriding the source column names
        #[arg(long)]
        schema: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Render {
            input,
            output,
            vega_lite,
            schema,
        } => render::run_render(&input, &output, vega_lite.as_deref(), schema.as_deref()),
        Command::Extract {
            input,
            dataset,
            output,
            schema,
        } => extract::run_extract(&input, dataset, output.as_deref(), schema.as_deref()),
    }
}
