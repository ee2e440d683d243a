use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::contract::{OutputFormat, OUTPUT_OBJECT_STEM};

/// `YYYY/MM/DD/config-output.<ext>` for the invocation date.
pub fn output_object_key(invocation_date: NaiveDate, format: OutputFormat) -> String {
    format!(
        "{}/{OUTPUT_OBJECT_STEM}.{}",
        invocation_date.format("%Y/%m/%d"),
        format.extension(),
    )
}

/// `<scratch_dir>/YYYY-MM-DD.<ext>`; a same-day rerun reuses the path.
pub fn scratch_file_path(
    scratch_dir: &Path,
    invocation_date: NaiveDate,
    format: OutputFormat,
) -> PathBuf {
    scratch_dir.join(format!(
        "{}.{}",
        invocation_date.format("%Y-%m-%d"),
        format.extension()
    ))
}
