use std::path::PathBuf;

use clap::Args;
use dctpack_core::container::{read_table_file, ImageGeometry};
use dctpack_core::CodeTables;

use crate::CliResult;

/// Shows the image size and the code tables stored in a table file
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Table file written by the encode command
    #[arg(short = 't', long = "table", value_name = "table file", required = true)]
    pub table_file: PathBuf,
}

impl InspectArgs {
    pub fn run(self) -> CliResult<()> {
        let (geometry, tables) = read_table_file(&self.table_file)?;
        print!("{}", summary(geometry, &tables));
        Ok(())
    }
}

fn summary(geometry: ImageGeometry, tables: &CodeTables) -> String {
    let mut out = format!(
        "image: {}x{} ({} blocks per channel)\n",
        geometry.width,
        geometry.height,
        geometry.block_count()
    );
    for (kind, table) in tables.iter() {
        match table.length_range() {
            Some((min, max)) => out.push_str(&format!(
                "{}: {} entries, code lengths {}..={}\n",
                kind,
                table.len(),
                min,
                max
            )),
            None => out.push_str(&format!("{}: empty\n", kind)),
        }
    }
    out
}
