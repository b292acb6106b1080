use std::path::{Path, PathBuf};

use crate::encoder::{encode, EncodedImage};
use crate::error::{EncodeError, Result};
use crate::media::{load_image, transform_planes};
use crate::transform::Dct2;

pub fn prepare() -> EncodeApi {
    EncodeApi::default()
}

#[derive(Default, Debug)]
pub struct EncodeApi {
    image: Option<PathBuf>,
    table_output: Option<PathBuf>,
    data_output: Option<PathBuf>,
}

impl EncodeApi {
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Where the code tables and the image size go.
    pub fn with_table_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.table_output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Where the block count and the packed payload go.
    pub fn with_data_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.data_output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<EncodedImage> {
        let Some(image) = self.image else {
            return Err(EncodeError::MissingImage);
        };
        let (Some(table_output), Some(data_output)) = (self.table_output, self.data_output) else {
            return Err(EncodeError::MissingOutput);
        };

        let (geometry, planes) = load_image(&image)?;
        let transformed = transform_planes(geometry, &planes, &Dct2::new())?;
        let encoded = encode(&transformed)?;
        encoded.save(&table_output, &data_output)?;

        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_require_an_image() {
        let result = prepare()
            .with_table_output("table.txt")
            .with_data_output("image.bin")
            .execute();
        assert!(matches!(result, Err(EncodeError::MissingImage)));
    }

    #[test]
    fn should_require_both_outputs() {
        let result = prepare()
            .with_image("image.png")
            .with_table_output("table.txt")
            .execute();
        assert!(matches!(result, Err(EncodeError::MissingOutput)));
    }

    #[test]
    fn should_report_missing_image_file() {
        let result = prepare()
            .with_image("/does/not/exist.png")
            .with_table_output("table.txt")
            .with_data_output("image.bin")
            .execute();
        assert!(matches!(result, Err(EncodeError::PathNotFound { .. })));
    }
}
