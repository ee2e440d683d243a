#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use config_export_core::config::{ExporterConfig, LogLevel};
use config_export_core::contract::QueryRequest;
use config_export_core::result_set::QueryResultPage;
use config_export_lambda::adapters::inventory::InventoryQuery;
use config_export_lambda::adapters::object_store::OutputStore;

/// Serves a fixed list of pages, or a failure at a chosen position.
pub struct PagedInventory {
    pages: Vec<Result<Vec<String>, String>>,
    served: Mutex<usize>,
}

impl PagedInventory {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|page| Ok(page.into_iter().map(str::to_string).collect()))
                .collect(),
            served: Mutex::new(0),
        }
    }

    pub fn failing_after(pages: Vec<Vec<&str>>, message: &str) -> Self {
        let mut inventory = Self::new(pages);
        inventory.pages.push(Err(message.to_string()));
        inventory
    }

    pub fn pages_served(&self) -> usize {
        *self.served.lock().expect("poisoned mutex")
    }
}

impl InventoryQuery for PagedInventory {
    fn pages<'a>(
        &'a self,
        _request: &QueryRequest,
    ) -> Box<dyn Iterator<Item = Result<QueryResultPage, String>> + 'a> {
        Box::new(self.pages.iter().map(move |page| {
            *self.served.lock().expect("poisoned mutex") += 1;
            page.clone().map(QueryResultPage::new)
        }))
    }
}

/// In-memory bucket keyed by `bucket/key`; later uploads overwrite.
#[derive(Default)]
pub struct MemoryBucket {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    upload_count: Mutex<usize>,
    reject_uploads: Option<String>,
}

impl MemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_uploads: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(&format!("{bucket}/{key}"))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("poisoned mutex").len()
    }

    pub fn upload_count(&self) -> usize {
        *self.upload_count.lock().expect("poisoned mutex")
    }
}

impl OutputStore for MemoryBucket {
    fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        _content_type: &str,
    ) -> Result<(), String> {
        if let Some(message) = &self.reject_uploads {
            return Err(message.clone());
        }
        let body = std::fs::read(path).map_err(|error| error.to_string())?;
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert(format!("{bucket}/{key}"), body);
        *self.upload_count.lock().expect("poisoned mutex") += 1;
        Ok(())
    }
}

pub fn test_config(scratch_dir: &Path, output_format: &str) -> ExporterConfig {
    ExporterConfig {
        aggregator_name: "org-aggregator".to_string(),
        output_bucket: "aws-config-output-eu-west-1-123456789012".to_string(),
        output_format: Some(output_format.to_string()),
        log_level: LogLevel::Debug,
        rejected_log_level: None,
        scratch_dir: scratch_dir.to_path_buf(),
    }
}
