use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Decodes a table file and a data file back into an image
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Table file written by the encode command
    #[arg(short = 't', long = "table", value_name = "table file", required = true)]
    pub table_file: PathBuf,

    /// Data file written by the encode command
    #[arg(short = 'd', long = "data", value_name = "data file", required = true)]
    pub data_file: PathBuf,

    /// Reconstructed image, the format follows the file extension
    #[arg(short = 'o', long = "out", value_name = "output image file", required = true)]
    pub output: PathBuf,
}

impl DecodeArgs {
    pub fn run(self) -> CliResult<()> {
        let geometry = dctpack_core::api::decode::prepare()
            .with_table_input(&self.table_file)
            .with_data_input(&self.data_file)
            .with_output(&self.output)
            .execute()?;

        log::info!(
            "decoded {}x{} pixels into {}",
            geometry.width,
            geometry.height,
            self.output.display()
        );
        Ok(())
    }
}
