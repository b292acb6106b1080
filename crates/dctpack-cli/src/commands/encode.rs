use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Encodes an image into a table file and a data file
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Image to encode, such as a PNG, JPEG or BMP file
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub image: PathBuf,

    /// Code tables and image size will be stored in this text file
    #[arg(short = 't', long = "table", value_name = "table file", required = true)]
    pub table_file: PathBuf,

    /// Block count and packed payload will be stored in this binary file
    #[arg(short = 'd', long = "data", value_name = "data file", required = true)]
    pub data_file: PathBuf,
}

impl EncodeArgs {
    pub fn run(self) -> CliResult<()> {
        let encoded = dctpack_core::api::encode::prepare()
            .with_image(&self.image)
            .with_table_output(&self.table_file)
            .with_data_output(&self.data_file)
            .execute()?;

        log::info!(
            "encoded {}x{} pixels in {} blocks into {} payload bytes",
            encoded.geometry.width,
            encoded.geometry.height,
            encoded.block_count,
            encoded.payload.len()
        );
        Ok(())
    }
}
