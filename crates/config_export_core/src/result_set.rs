//! Page parsing and eager accumulation of query results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One inventory entry. Field order is kept as received.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResultPage {
    pub results: Vec<String>,
}

impl QueryResultPage {
    pub fn new(results: Vec<String>) -> Self {
        Self { results }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub records: Vec<Record>,
    pub page_count: usize,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDecodeError {
    #[error("page {page_index} element {element_index} is not valid JSON: {message}")]
    InvalidJson {
        page_index: usize,
        element_index: usize,
        message: String,
    },
    #[error("page {page_index} element {element_index} is not a JSON object")]
    NotAnObject {
        page_index: usize,
        element_index: usize,
    },
}

#[derive(Debug, Error)]
pub enum DrainError<E> {
    #[error("{0}")]
    Source(E),
    #[error(transparent)]
    Decode(#[from] RecordDecodeError),
}

pub fn parse_page(
    page_index: usize,
    page: &QueryResultPage,
) -> Result<Vec<Record>, RecordDecodeError> {
    page.results
        .iter()
        .enumerate()
        .map(|(element_index, raw)| {
            let value: Value =
                serde_json::from_str(raw).map_err(|error| RecordDecodeError::InvalidJson {
                    page_index,
                    element_index,
                    message: error.to_string(),
                })?;
            match value {
                Value::Object(record) => Ok(record),
                _ => Err(RecordDecodeError::NotAnObject {
                    page_index,
                    element_index,
                }),
            }
        })
        .collect()
}

/// Drains every page before returning; the whole result set is held in
/// memory. The first source or decode error stops the drain.
pub fn drain_pages<E, I>(pages: I) -> Result<ResultSet, DrainError<E>>
where
    I: IntoIterator<Item = Result<QueryResultPage, E>>,
{
    pages
        .into_iter()
        .enumerate()
        .try_fold(ResultSet::default(), |mut acc, (page_index, page)| {
            let page = page.map_err(DrainError::Source)?;
            acc.records.extend(parse_page(page_index, &page)?);
            acc.page_count += 1;
            Ok(acc)
        })
}
