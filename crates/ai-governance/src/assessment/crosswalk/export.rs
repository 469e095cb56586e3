use std::io::Write;

use serde::Serialize;

use super::mapper::MappingEntry;

#[derive(Serialize)]
struct MappingRow<'a> {
    control_id: &'a str,
    control_name: &'a str,
    nist_ref: &'a str,
    function: &'a str,
    category: &'a str,
    designation: &'static str,
    implementation_level: &'static str,
    control_type: &'static str,
    in_taxonomy: bool,
    finding: &'a str,
}

impl<'a> From<&'a MappingEntry> for MappingRow<'a> {
    fn from(entry: &'a MappingEntry) -> Self {
        Self {
            control_id: &entry.control_id,
            control_name: &entry.control_name,
            nist_ref: &entry.nist_ref,
            function: entry.function.map_or("", |function| function.label()),
            category: entry.category.as_deref().unwrap_or(""),
            designation: entry.designation.label(),
            implementation_level: entry.implementation_level.map_or("", |level| level.label()),
            control_type: entry.control_type.map_or("", |kind| kind.label()),
            in_taxonomy: entry.in_taxonomy,
            finding: &entry.finding,
        }
    }
}

/// Write mapping entries as an audit CSV with a header row.
pub fn write_mapping_csv<W: Write>(writer: W, entries: &[MappingEntry]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for entry in entries {
        csv_writer.serialize(MappingRow::from(entry))?;
    }
    csv_writer.flush()?;
    Ok(())
}
