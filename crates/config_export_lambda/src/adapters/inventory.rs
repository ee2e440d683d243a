use config_export_core::contract::QueryRequest;
use config_export_core::result_set::QueryResultPage;

/// Lazily yields result pages for a query; each item is one service round trip.
pub trait InventoryQuery {
    fn pages<'a>(
        &'a self,
        request: &QueryRequest,
    ) -> Box<dyn Iterator<Item = Result<QueryResultPage, String>> + 'a>;
}
