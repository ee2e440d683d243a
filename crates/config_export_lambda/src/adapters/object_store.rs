use std::path::Path;

pub trait OutputStore {
    fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<(), String>;
}
