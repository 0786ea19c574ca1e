//! CSV export of visibility records.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::CheckerError;
use crate::records::VisibilityRecord;

const CSV_HEADER: &str = "platform,prompt,success,brand_mentioned,mention_type,\
competitors_mentioned,sentiment,response_time,timestamp";

/// Write one CSV file per run into `dir`, creating the directory if needed.
///
/// The filename embeds the current time as `visibility_YYYYMMDD_HHMMSS.csv`,
/// so repeated runs never overwrite each other. Returns the path written.
///
/// # Errors
///
/// Returns [`CheckerError::Export`] when the directory cannot be created or
/// the file cannot be written.
pub fn write_records_csv(
    dir: &Path,
    records: &[VisibilityRecord],
) -> Result<PathBuf, CheckerError> {
    fs::create_dir_all(dir).map_err(|source| CheckerError::Export {
        path: dir.display().to_string(),
        source,
    })?;

    let filename = format!("visibility_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    let mut contents = String::from(CSV_HEADER);
    contents.push('\n');
    for record in records {
        contents.push_str(&csv_row(record));
        contents.push('\n');
    }

    fs::write(&path, contents).map_err(|source| CheckerError::Export {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        "wrote visibility export"
    );
    Ok(path)
}

fn csv_row(record: &VisibilityRecord) -> String {
    let fields = [
        record.platform.to_string(),
        record.prompt.clone(),
        record.result.success.to_string(),
        record.mentions.brand_mentioned.to_string(),
        record.mentions.mention_type.to_string(),
        record.mentions.competitors_mentioned.join(";"),
        record.mentions.sentiment.to_string(),
        format!("{:.3}", record.result.latency.as_secs_f64()),
        record.timestamp.to_rfc3339(),
    ];
    fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
