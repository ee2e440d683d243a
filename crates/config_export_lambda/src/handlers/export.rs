use std::time::Instant;

use chrono::NaiveDate;
use config_export_core::config::ExporterConfig;
use config_export_core::contract::{ExportSummary, OutputFormat, QueryRequest};
use config_export_core::render::{render, write_output_file, RenderError};
use config_export_core::result_set::{drain_pages, DrainError, RecordDecodeError, ResultSet};
use config_export_core::storage_keys::{output_object_key, scratch_file_path};
use lambda_runtime::tracing;
use thiserror::Error;

use crate::adapters::inventory::InventoryQuery;
use crate::adapters::object_store::OutputStore;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Problem calling AWS Config: {0}")]
    Inventory(String),
    #[error("Malformed query result: {0}")]
    RecordDecode(#[from] RecordDecodeError),
    #[error("Failed to write output file: {0}")]
    LocalWrite(#[from] RenderError),
    #[error("Problem uploading output to S3: {0}")]
    Upload(String),
}

impl From<DrainError<String>> for ExportError {
    fn from(error: DrainError<String>) -> Self {
        match error {
            DrainError::Source(message) => Self::Inventory(message),
            DrainError::Decode(decode) => Self::RecordDecode(decode),
        }
    }
}

/// One export pass: query, drain, render, write locally, upload.
///
/// Failures are logged at error level and returned unchanged; nothing is
/// retried and a failed upload leaves the local file in place.
pub fn run_export(
    config: &ExporterConfig,
    invocation_date: NaiveDate,
    inventory: &impl InventoryQuery,
    store: &impl OutputStore,
) -> Result<ExportSummary, ExportError> {
    let resolution = OutputFormat::resolve(config.output_format.as_deref());
    if let Some(rejected) = &resolution.rejected {
        tracing::warn!(
            configured = %rejected,
            "Output format must be CSV or JSON. Setting to JSON."
        );
    }
    let format = resolution.format;
    tracing::debug!(%format, "File output format set");

    let started_at = Instant::now();
    match export(config, invocation_date, format, inventory, store) {
        Ok(summary) => {
            tracing::info!(
                bucket = %summary.bucket,
                key = %summary.key,
                record_count = summary.record_count,
                duration_ms = started_at.elapsed().as_millis() as u64,
                "Success"
            );
            Ok(summary)
        }
        Err(error) => {
            tracing::error!(
                error = %error,
                duration_ms = started_at.elapsed().as_millis() as u64,
                "Config export failed"
            );
            Err(error)
        }
    }
}

fn export(
    config: &ExporterConfig,
    invocation_date: NaiveDate,
    format: OutputFormat,
    inventory: &impl InventoryQuery,
    store: &impl OutputStore,
) -> Result<ExportSummary, ExportError> {
    let request = QueryRequest::for_aggregator(config.aggregator_name.clone());
    let result_set = query_inventory(&request, inventory)?;

    let scratch_path = scratch_file_path(&config.scratch_dir, invocation_date, format);
    tracing::info!(%format, "Writing results to output file");
    tracing::debug!(path = %scratch_path.display(), "Output file path");
    let output = render(&result_set.records, format)?;
    write_output_file(&scratch_path, &output)?;

    let key = output_object_key(invocation_date, format);
    tracing::info!("Uploading output to S3");
    tracing::debug!(
        path = %scratch_path.display(),
        bucket = %config.output_bucket,
        key = %key,
        "Uploading output file"
    );
    store
        .upload_file(
            &config.output_bucket,
            &key,
            &scratch_path,
            format.content_type(),
        )
        .map_err(ExportError::Upload)?;

    Ok(ExportSummary {
        bucket: config.output_bucket.clone(),
        key,
        format,
        page_count: result_set.page_count,
        record_count: result_set.len(),
        content_sha256: output.sha256,
    })
}

fn query_inventory(
    request: &QueryRequest,
    inventory: &impl InventoryQuery,
) -> Result<ResultSet, ExportError> {
    tracing::info!("Calling AWS Config advanced query");
    tracing::debug!(
        aggregator_name = %request.aggregator_name,
        expression = %request.expression,
        page_size = request.page_size,
        "Query parameters"
    );

    let result_set = drain_pages(inventory.pages(request))?;
    tracing::info!(
        page_count = result_set.page_count,
        record_count = result_set.len(),
        "Query results collected"
    );
    Ok(result_set)
}
