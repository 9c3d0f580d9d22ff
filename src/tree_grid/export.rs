use chrono::{DateTime, Local};
use itertools::Itertools as _;

use super::types::{DataItem, DataItemRow};

/// A column that can be exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ExportColumn {
    Label,
    Id,
    Kind,
    Source,
    Count,
    Description,
    LongDescription,
    Location,
    Tags,
}

impl ExportColumn {
    /// The column key, used as the CSV header.
    pub fn key(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Id => "id",
            Self::Kind => "type",
            Self::Source => "source",
            Self::Count => "count",
            Self::Description => "description",
            Self::LongDescription => "longDescription",
            Self::Location => "location",
            Self::Tags => "tags",
        }
    }

    fn value(self, item: &DataItem) -> String {
        match self {
            Self::Label => item.label.clone(),
            Self::Id => item.id.to_string(),
            Self::Kind => item.kind.clone(),
            Self::Source => item.source.clone(),
            Self::Count => item.count.to_string(),
            Self::Description => item.description.clone(),
            Self::LongDescription => item.long_description.clone(),
            Self::Location => item.location.clone(),
            Self::Tags => item.tags.iter().join(","),
        }
    }
}

pub const DEFAULT_EXPORT_COLUMNS: [ExportColumn; 4] = [
    ExportColumn::Label,
    ExportColumn::Id,
    ExportColumn::Tags,
    ExportColumn::Description,
];

/// Prefix of every export file name.
pub const EXPORT_FILE_PREFIX: &str = "segment-admin-export";

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ExportParams {
    pub columns: Vec<ExportColumn>,
    /// File name without extension.
    pub file_name: String,
}

impl ExportParams {
    /// Default columns, file name `segment-admin-export-<stamp>`.
    ///
    /// `stamp` is caller-formatted, e.g. `yyMMdd` for the default export or `yyMMdd-HH:mm:ss` for
    /// an export triggered from the context menu.
    pub fn with_stamp(stamp: &str) -> Self {
        Self {
            columns: DEFAULT_EXPORT_COLUMNS.to_vec(),
            file_name: format!("{EXPORT_FILE_PREFIX}-{stamp}"),
        }
    }

    /// Stamped with today's date, `yyMMdd`.
    pub fn default_now() -> Self {
        Self::on_day(&Local::now())
    }

    pub fn on_day(time: &DateTime<Local>) -> Self {
        Self::with_stamp(&time.format("%y%m%d").to_string())
    }

    /// Stamped to the second, `yyMMdd-HH:mm:ss`. Used for exports from the context menu.
    pub fn at(time: &DateTime<Local>) -> Self {
        Self::with_stamp(&time.format("%y%m%d-%H:%M:%S").to_string())
    }

    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.file_name)
    }
}

/// Render `rows` as CSV (header line first, `\n` line endings).
pub fn export_csv<'a>(
    rows: impl IntoIterator<Item = &'a DataItemRow>,
    params: &ExportParams,
) -> String {
    let header = params
        .columns
        .iter()
        .map(|column| csv_field(column.key()))
        .join(",");

    let mut out = header;
    out.push('\n');
    for row in rows {
        let line = params
            .columns
            .iter()
            .map(|column| csv_field(&column.value(&row.item)))
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Every field is quoted; embedded quotes are doubled.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
