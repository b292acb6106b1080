//! The four logical tables of an image and their statistics.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::block::ChannelClass;
use crate::error::{EncodeError, Result};
use crate::huffman::{Code, CodeTable, FrequencyTable, TableKey};

/// One of the four logical tables, in container order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    DcLuma,
    AcLuma,
    DcChroma,
    AcChroma,
}

impl TableKind {
    /// Order in which the tables appear in the table file.
    pub const ALL: [TableKind; 4] = [
        TableKind::DcLuma,
        TableKind::AcLuma,
        TableKind::DcChroma,
        TableKind::AcChroma,
    ];

    pub fn dc(class: ChannelClass) -> Self {
        match class {
            ChannelClass::Luminance => TableKind::DcLuma,
            ChannelClass::Chrominance => TableKind::DcChroma,
        }
    }

    pub fn ac(class: ChannelClass) -> Self {
        match class {
            ChannelClass::Luminance => TableKind::AcLuma,
            ChannelClass::Chrominance => TableKind::AcChroma,
        }
    }

    pub fn is_dc(self) -> bool {
        matches!(self, TableKind::DcLuma | TableKind::DcChroma)
    }

    pub fn name(self) -> &'static str {
        match self {
            TableKind::DcLuma => "dc_y",
            TableKind::AcLuma => "ac_y",
            TableKind::DcChroma => "dc_c",
            TableKind::AcChroma => "ac_c",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistics of all four tables, gathered by the first pass.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTables([FrequencyTable; 4]);

impl FrequencyTables {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn observe(&mut self, kind: TableKind, key: TableKey) {
        self.0[kind.index()].observe(key);
    }
}

impl Index<TableKind> for FrequencyTables {
    type Output = FrequencyTable;

    fn index(&self, kind: TableKind) -> &FrequencyTable {
        &self.0[kind.index()]
    }
}

impl IndexMut<TableKind> for FrequencyTables {
    fn index_mut(&mut self, kind: TableKind) -> &mut FrequencyTable {
        &mut self.0[kind.index()]
    }
}

/// The code tables of one image. Built once between the two passes and
/// only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTables([CodeTable; 4]);

impl CodeTables {
    /// Build all four tables, consuming the statistics.
    pub fn build(frequencies: FrequencyTables) -> Result<Self> {
        let mut tables = CodeTables::default();
        for kind in TableKind::ALL {
            tables.0[kind.index()] = CodeTable::build(kind, &frequencies[kind])?;
            log::debug!(
                "table {}: {} symbols from {} occurrences, code lengths {:?}",
                kind,
                tables[kind].len(),
                frequencies[kind].total(),
                tables[kind].length_range()
            );
        }
        Ok(tables)
    }

    pub fn from_tables(tables: [CodeTable; 4]) -> Self {
        CodeTables(tables)
    }

    /// Code of `key` in table `kind`.
    ///
    /// A missing key means the emission pass saw data the statistics pass
    /// did not.
    #[inline]
    pub fn code(&self, kind: TableKind, key: TableKey) -> Result<Code> {
        self[kind]
            .get(&key)
            .ok_or(EncodeError::InconsistentSymbolStatistics { table: kind, key })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TableKind, &CodeTable)> {
        TableKind::ALL.into_iter().map(move |kind| (kind, &self[kind]))
    }
}

impl Index<TableKind> for CodeTables {
    type Output = CodeTable;

    fn index(&self, kind: TableKind) -> &CodeTable {
        &self.0[kind.index()]
    }
}
