use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Reads files relative to `base_path`; absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CalcError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_relative_and_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("table.csv");
        std::fs::write(&file_path, b"N,1%\n0,0\n").unwrap();

        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        assert_eq!(storage.read_file("table.csv").await.unwrap(), b"N,1%\n0,0\n");

        let elsewhere = LocalStorage::new("/nonexistent-base".to_string());
        let absolute = file_path.to_str().unwrap();
        assert!(elsewhere.read_file(absolute).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        assert!(matches!(
            storage.read_file("missing.csv").await,
            Err(CalcError::IoError(_))
        ));
    }
}
