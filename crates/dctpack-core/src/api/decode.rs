use std::path::{Path, PathBuf};

use crate::container::ImageGeometry;
use crate::decoder::{decode_files, reconstruct_coefficients};
use crate::error::DecodeError;
use crate::media::{merge_planes, restore_planes};
use crate::transform::Dct2;

pub fn prepare() -> DecodeApi {
    DecodeApi::default()
}

#[derive(Default, Debug)]
pub struct DecodeApi {
    table_input: Option<PathBuf>,
    data_input: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl DecodeApi {
    pub fn with_table_input<A: AsRef<Path>>(mut self, input: A) -> Self {
        self.table_input = Some(input.as_ref().to_path_buf());
        self
    }

    pub fn with_data_input<A: AsRef<Path>>(mut self, input: A) -> Self {
        self.data_input = Some(input.as_ref().to_path_buf());
        self
    }

    /// The reconstructed image; its format follows the file extension.
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<ImageGeometry, DecodeError> {
        let (Some(table_input), Some(data_input)) = (self.table_input, self.data_input) else {
            return Err(DecodeError::MissingInput);
        };
        let Some(output) = self.output else {
            return Err(DecodeError::MissingOutput);
        };

        let quantized = decode_files(&table_input, &data_input)?;
        let geometry = quantized.geometry();
        let coefficients = reconstruct_coefficients(&quantized);
        let planes = restore_planes(geometry, &coefficients, &Dct2::new());

        merge_planes(&planes)
            .save(&output)
            .map_err(DecodeError::ImageEncodingError)?;
        log::debug!("reconstructed image written to {}", output.display());

        Ok(geometry)
    }
}
