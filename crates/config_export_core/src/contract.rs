use serde::{Deserialize, Serialize};

/// Advanced query issued against the configuration aggregator on every run.
pub const QUERY_EXPRESSION: &str = "
SELECT
  resourceId,
  resourceType,
  supplementaryConfiguration.BucketVersioningConfiguration.status,
  resourceCreationTime,
  awsRegion,
  supplementaryConfiguration.ServerSideEncryptionConfiguration.rules.applyServerSideEncryptionByDefault.sseAlgorithm,
  tags
WHERE
  resourceType = 'AWS::S3::Bucket'
";

pub const PAGE_SIZE: i32 = 50;
pub const OUTPUT_OBJECT_STEM: &str = "config-output";
pub const JSON_RESULTS_KEY: &str = "Results";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    /// Resolves a configured format name, falling back to JSON for anything
    /// outside `json`/`csv`. A missing value counts as unrecognized.
    pub fn resolve(raw: Option<&str>) -> FormatResolution {
        let normalized = raw.map(str::to_ascii_lowercase);
        match normalized.as_deref() {
            Some("json") => FormatResolution::accepted(Self::Json),
            Some("csv") => FormatResolution::accepted(Self::Csv),
            _ => FormatResolution {
                format: Self::Json,
                rejected: Some(raw.unwrap_or_default().to_string()),
            },
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResolution {
    pub format: OutputFormat,
    /// Raw value that was replaced by the default, if any.
    pub rejected: Option<String>,
}

impl FormatResolution {
    fn accepted(format: OutputFormat) -> Self {
        Self {
            format,
            rejected: None,
        }
    }

    pub fn fell_back(&self) -> bool {
        self.rejected.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub expression: String,
    pub aggregator_name: String,
    pub page_size: i32,
}

impl QueryRequest {
    pub fn for_aggregator(aggregator_name: impl Into<String>) -> Self {
        Self {
            expression: QUERY_EXPRESSION.to_string(),
            aggregator_name: aggregator_name.into(),
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportSummary {
    pub bucket: String,
    pub key: String,
    pub format: OutputFormat,
    pub page_count: usize,
    pub record_count: usize,
    pub content_sha256: String,
}
