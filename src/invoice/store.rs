use std::fs;
use std::io;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::domain::ports::InvoiceStore;

/// Stores rendered invoices as files under one directory.
pub struct FileInvoiceStore {
    dir: PathBuf,
}

impl FileInvoiceStore {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl InvoiceStore for FileInvoiceStore {
    fn write(&self, name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(path.to_string_lossy().into_owned())
    }

    fn remove(&self, name: &str) -> Result<(), DomainError> {
        let path = self.dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::InvoiceStore;

    #[test]
    fn write_then_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileInvoiceStore::new(dir.path()).expect("store");

        let path = store.write("invoice-a.pdf", b"%PDF-test").expect("write");
        assert!(std::path::Path::new(&path).exists());

        store.remove("invoice-a.pdf").expect("remove");
        assert!(!std::path::Path::new(&path).exists());
    }

    #[test]
    fn removing_a_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileInvoiceStore::new(dir.path()).expect("store");
        store.remove("invoice-missing.pdf").expect("remove");
    }

    #[test]
    fn new_creates_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("invoices");
        FileInvoiceStore::new(&nested).expect("store");
        assert!(nested.is_dir());
    }
}
