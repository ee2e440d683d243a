use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use config_export_core::config::{ExporterConfig, LogLevel};
use config_export_core::contract::{ExportSummary, QueryRequest};
use config_export_core::result_set::QueryResultPage;
use config_export_lambda::adapters::inventory::InventoryQuery;
use config_export_lambda::adapters::object_store::OutputStore;
use config_export_lambda::handlers::export::run_export;
use config_export_lambda::logging::json_subscriber;
use lambda_runtime::tracing::subscriber::util::SubscriberInitExt;
use lambda_runtime::{service_fn, tracing, Error, LambdaEvent};
use serde_json::Value;

struct AwsConfigInventory {
    config_client: aws_sdk_config::Client,
}

/// Follows `next_token` one page per `next()` call.
struct AggregatePages<'a> {
    client: &'a aws_sdk_config::Client,
    request: QueryRequest,
    next_token: Option<String>,
    finished: bool,
}

impl Iterator for AggregatePages<'_> {
    type Item = Result<QueryResultPage, String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let client = self.client.clone();
        let request = self.request.clone();
        let next_token = self.next_token.take();

        let response = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .select_aggregate_resource_config()
                    .expression(request.expression)
                    .configuration_aggregator_name(request.aggregator_name)
                    .limit(request.page_size)
                    .set_next_token(next_token)
                    .send()
                    .await
                    .map_err(|error| {
                        format!(
                            "select_aggregate_resource_config failed: {}",
                            aws_sdk_config::error::DisplayErrorContext(&error)
                        )
                    })
            })
        });

        match response {
            Ok(output) => {
                self.next_token = output
                    .next_token()
                    .filter(|token| !token.is_empty())
                    .map(str::to_string);
                self.finished = self.next_token.is_none();
                Some(Ok(QueryResultPage::new(output.results().to_vec())))
            }
            Err(message) => {
                self.finished = true;
                Some(Err(message))
            }
        }
    }
}

impl InventoryQuery for AwsConfigInventory {
    fn pages<'a>(
        &'a self,
        request: &QueryRequest,
    ) -> Box<dyn Iterator<Item = Result<QueryResultPage, String>> + 'a> {
        Box::new(AggregatePages {
            client: &self.config_client,
            request: request.clone(),
            next_token: None,
            finished: false,
        })
    }
}

struct S3OutputStore {
    s3_client: aws_sdk_s3::Client,
}

impl OutputStore for S3OutputStore {
    fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), String> {
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let file_path = path.to_path_buf();
        let content_type = content_type.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let body = ByteStream::from_path(&file_path).await.map_err(|error| {
                    format!("failed to read {}: {error}", file_path.display())
                })?;
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .content_type(content_type)
                    .body(body)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!(
                            "failed to write object to s3: {}",
                            aws_sdk_s3::error::DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &ExporterConfig,
    inventory: &AwsConfigInventory,
    store: &S3OutputStore,
) -> Result<ExportSummary, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Invocation received");
    let invocation_date = Utc::now().date_naive();
    Ok(run_export(config, invocation_date, inventory, store)?)
}

fn init_logging(level: LogLevel) {
    json_subscriber(level, std::io::stdout).init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = match ExporterConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            init_logging(LogLevel::default());
            tracing::error!(error = %error, "Invalid configuration");
            return Err(error.into());
        }
    };

    init_logging(config.log_level);
    if let Some(rejected) = &config.rejected_log_level {
        tracing::warn!(configured = %rejected, "Unknown LOG_LEVEL. Using INFO.");
    }

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let inventory = AwsConfigInventory {
        config_client: aws_sdk_config::Client::new(&aws_config),
    };
    let store = S3OutputStore {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        handle_request(event, &config, &inventory, &store)
    }))
    .await
}
