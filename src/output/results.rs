//! Collected extraction records

use crate::extract::PageRecord;
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe, append-only collection of kept records
///
/// Records are stored in arrival order. Arrival order across workers depends
/// on fetch latency and carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    records: Arc<Mutex<Vec<PageRecord>>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PageRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends a record
    pub fn append(&self, record: PageRecord) {
        self.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A copy of the records collected so far
    pub fn records(&self) -> Vec<PageRecord> {
        self.lock().clone()
    }

    /// Serializes the records as a pretty-printed JSON array
    pub fn to_json(&self) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(&*self.lock())?)
    }

    /// Writes the records to `path` as a JSON array (2-space indentation,
    /// non-ASCII characters left unescaped)
    ///
    /// Missing parent directories are created.
    pub fn save(&self, path: &Path) -> OutputResult<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| OutputError::write(parent, e))?;
        }

        let file = File::create(path).map_err(|e| OutputError::write(path, e))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, &*self.lock())?;
        writer.flush().map_err(|e| OutputError::write(path, e))?;

        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ContactRecord, ContentRecord};
    use tempfile::TempDir;

    fn content(url: &str, text: &str) -> PageRecord {
        PageRecord::Content(ContentRecord {
            url: url.to_string(),
            text: text.to_string(),
        })
    }

    #[test]
    fn test_save_results_creates_valid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("content_data.json");

        let results = ResultAggregator::new();
        results.append(content("https://example.com/a", "first"));
        results.append(content("https://example.com/b", "second"));

        let saved = results.save(&path).unwrap();
        assert_eq!(saved, path);

        let data: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["url"], "https://example.com/a");
        assert_eq!(data[1]["url"], "https://example.com/b");
    }

    #[test]
    fn test_save_empty_results() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seo_data.json");

        ResultAggregator::new().save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_json_is_indented_and_unescaped() {
        let results = ResultAggregator::new();
        results.append(PageRecord::Contacts(ContactRecord {
            url: "https://example.com/kontakt".to_string(),
            emails: vec!["info@test.cz".to_string()],
            phones: vec![],
        }));
        results.append(content("https://example.com/č", "Žluťoučký kůň"));

        let json = results.to_json().unwrap();
        assert!(json.contains("\n  {\n    \"url\""));
        assert!(json.contains("Žluťoučký kůň"));
        assert!(!json.contains("\\u"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_not_lost() {
        let results = ResultAggregator::new();

        let mut handles = Vec::new();
        for w in 0..8 {
            let results = results.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    results.append(content(&format!("https://example.com/{}/{}", w, i), "x"));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(results.len(), 400);
        let mut urls: Vec<String> = results
            .records()
            .iter()
            .map(|r| r.url().to_string())
            .collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), 400);
    }
}
