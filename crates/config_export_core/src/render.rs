//! Result set serialization to the JSON and CSV output files.

use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::contract::OutputFormat;
use crate::flatten::flatten_records;
use crate::result_set::Record;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("output file i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ResultsEnvelope<'a> {
    #[serde(rename = "Results")]
    results: &'a [Record],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

pub fn render(records: &[Record], format: OutputFormat) -> Result<RenderedOutput, RenderError> {
    let bytes = match format {
        OutputFormat::Json => render_json(records)?,
        OutputFormat::Csv => render_csv(records)?,
    };
    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    Ok(RenderedOutput { bytes, sha256 })
}

/// `{"Results": [...]}` with every record as received.
pub fn render_json(records: &[Record]) -> Result<Vec<u8>, RenderError> {
    Ok(serde_json::to_vec(&ResultsEnvelope { results: records })?)
}

/// Header row of flattened paths followed by one row per record. An empty
/// result set renders as an empty file; records without fields still get
/// one (blank) line each.
pub fn render_csv(records: &[Record]) -> Result<Vec<u8>, RenderError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let table = flatten_records(records);
    if table.columns.is_empty() {
        return Ok(b"\n".repeat(table.rows.len() + 1));
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.columns)?;
    for row in table.aligned_rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    wtr.into_inner()
        .map_err(|error| RenderError::Io(error.into_error()))
}

/// Writes the rendered bytes, replacing any file already at `path`.
pub fn write_output_file(
    path: impl AsRef<Path>,
    output: &RenderedOutput,
) -> Result<(), RenderError> {
    fs::write(path, &output.bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|value| match value {
                Value::Object(map) => map,
                _ => panic!("test record must be an object"),
            })
            .collect()
    }

    #[test]
    fn json_output_wraps_records_under_results_key() {
        let input = records(vec![
            json!({"resourceId": "bucket-b", "tags": [{"key": "env", "value": "prod"}]}),
            json!({"resourceId": "bucket-a"}),
        ]);

        let bytes = render_json(&input).expect("json should render");
        let text = String::from_utf8(bytes).expect("json is utf-8");
        assert_eq!(
            text,
            r#"{"Results":[{"resourceId":"bucket-b","tags":[{"key":"env","value":"prod"}]},{"resourceId":"bucket-a"}]}"#
        );
    }

    #[test]
    fn json_output_keeps_non_ascii_unescaped() {
        let input = records(vec![json!({"tags": [{"key": "owner", "value": "Zoë"}]})]);
        let text = String::from_utf8(render_json(&input).expect("json should render"))
            .expect("json is utf-8");
        assert_eq!(
            text,
            r#"{"Results":[{"tags":[{"key":"owner","value":"Zoë"}]}]}"#
        );
    }

    #[test]
    fn json_output_for_empty_result_set() {
        let bytes = render_json(&[]).expect("json should render");
        assert_eq!(bytes, br#"{"Results":[]}"#);
    }

    #[test]
    fn csv_output_has_union_header_and_empty_cells() {
        let input = records(vec![
            json!({
                "resourceId": "bucket-a",
                "supplementaryConfiguration": {
                    "BucketVersioningConfiguration": {"status": "Enabled"}
                }
            }),
            json!({"resourceId": "bucket-b", "awsRegion": "eu-west-1"}),
        ]);

        let bytes = render_csv(&input).expect("csv should render");
        let text = String::from_utf8(bytes).expect("csv is utf-8");
        assert_eq!(
            text,
            "resourceId,supplementaryConfiguration.BucketVersioningConfiguration.status,awsRegion\n\
             bucket-a,Enabled,\n\
             bucket-b,,eu-west-1\n"
        );
    }

    #[test]
    fn csv_quotes_cells_containing_delimiters() {
        let input = records(vec![json!({"tags": [{"key": "a", "value": "b"}]})]);
        let text = String::from_utf8(render_csv(&input).expect("csv should render"))
            .expect("csv is utf-8");
        assert_eq!(text, "tags\n\"[{\"\"key\"\":\"\"a\"\",\"\"value\"\":\"\"b\"\"}]\"\n");
    }

    #[test]
    fn csv_output_for_empty_result_set_is_empty() {
        assert!(render_csv(&[]).expect("csv should render").is_empty());
    }

    #[test]
    fn csv_keeps_one_row_per_record_without_fields() {
        let bytes = render_csv(&[Record::new(), Record::new()]).expect("csv should render");
        assert_eq!(bytes, b"\n\n\n");
    }

    #[test]
    fn identical_input_renders_identical_digest() {
        let input = records(vec![json!({"resourceId": "bucket-a"})]);
        let first = render(&input, OutputFormat::Csv).expect("render should pass");
        let second = render(&input, OutputFormat::Csv).expect("render should pass");
        assert_eq!(first, second);
        assert_eq!(first.sha256.len(), 64);
    }

    #[test]
    fn write_output_file_overwrites_existing_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("2026-02-14.json");
        std::fs::write(&path, b"stale contents that are longer").expect("seed file");

        let output = render(&[], OutputFormat::Json).expect("render should pass");
        write_output_file(&path, &output).expect("write should pass");

        assert_eq!(std::fs::read(&path).expect("read back"), br#"{"Results":[]}"#);
    }
}
