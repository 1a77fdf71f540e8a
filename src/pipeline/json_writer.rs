//! Streaming JSON array writer
//!
//! Writes one timestamped result file per run, item by item, with the
//! array framing split across open and close so a consumer tailing the
//! file sees complete JSON objects. Titles and contents get their
//! whitespace collapsed, and a defensive URL check drops anything a
//! misbehaving upstream might re-emit.

use crate::item::DocumentItem;
use crate::pipeline::{ItemSink, SinkError};
use chrono::Local;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink writing a JSON array of items to disk
pub struct JsonArrayWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    first: bool,
    seen: HashSet<String>,
    written: usize,
}

impl JsonArrayWriter {
    /// Creates `<data_dir>/<name>_<timestamp>.json` and writes the
    /// opening bracket
    pub fn create(data_dir: &Path, name: &str) -> Result<Self, SinkError> {
        std::fs::create_dir_all(data_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = data_dir.join(format!("{}_{}.json", name, timestamp));

        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(b"[\n")?;

        tracing::info!("Writing results to {}", path.display());

        Ok(Self {
            writer,
            path,
            first: true,
            seen: HashSet::new(),
            written: 0,
        })
    }

    /// Path of the file being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Items written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ItemSink for JsonArrayWriter {
    async fn process(&mut self, mut item: DocumentItem) -> Result<(), SinkError> {
        if !self.seen.insert(item.url.clone()) {
            tracing::debug!("Writer dropped duplicate URL: {}", item.url);
            return Ok(());
        }

        item.title = clean_text(&item.title);
        item.content = clean_text(&item.content);

        let line = serde_json::to_string(&item)?;
        if self.first {
            self.first = false;
        } else {
            self.writer.write_all(b",\n")?;
        }
        self.writer.write_all(line.as_bytes())?;
        self.written += 1;

        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.writer.write_all(b"\n]")?;
        self.writer.flush()?;
        tracing::info!("Wrote {} items to {}", self.written, self.path.display());
        Ok(())
    }
}

/// Collapses all whitespace runs to single spaces and trims
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{DOCUMENT_TYPE_FAQ, SOURCE_NAME};
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn item(url: &str, content: &str) -> DocumentItem {
        DocumentItem {
            page: 1,
            title: "태양광 질문?".to_string(),
            content: content.to_string(),
            url: url.to_string(),
            source: SOURCE_NAME.to_string(),
            document_type: DOCUMENT_TYPE_FAQ.to_string(),
            date_published: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            crawled_at: Utc::now(),
            file_urls: vec![],
        }
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("첫  문단\n\n둘째   문단"), "첫 문단 둘째 문단");
        assert_eq!(clean_text("  이미 깨끗함  "), "이미 깨끗함");
        assert_eq!(clean_text(""), "");
    }

    #[tokio::test]
    async fn test_writes_valid_json_array() {
        let dir = TempDir::new().unwrap();
        let mut writer = JsonArrayWriter::create(dir.path(), "knrec_faq").unwrap();
        let path = writer.path().to_path_buf();

        writer.process(item("https://s.test/d/1", "내용 1")).await.unwrap();
        writer.process(item("https://s.test/d/2", "내용 2")).await.unwrap();
        writer.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<DocumentItem> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].url, "https://s.test/d/2");
    }

    #[tokio::test]
    async fn test_empty_run_is_valid_json() {
        let dir = TempDir::new().unwrap();
        let mut writer = JsonArrayWriter::create(dir.path(), "knrec_faq").unwrap();
        let path = writer.path().to_path_buf();
        writer.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<DocumentItem> = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_urls_dropped() {
        let dir = TempDir::new().unwrap();
        let mut writer = JsonArrayWriter::create(dir.path(), "knrec_faq").unwrap();
        let path = writer.path().to_path_buf();

        writer.process(item("https://s.test/d/1", "내용")).await.unwrap();
        writer.process(item("https://s.test/d/1", "내용")).await.unwrap();
        writer.close().await.unwrap();

        assert_eq!(writer.written(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<DocumentItem> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[tokio::test]
    async fn test_content_whitespace_collapsed_on_write() {
        let dir = TempDir::new().unwrap();
        let mut writer = JsonArrayWriter::create(dir.path(), "knrec_faq").unwrap();
        let path = writer.path().to_path_buf();

        writer
            .process(item("https://s.test/d/1", "문단 하나\n\n문단 둘"))
            .await
            .unwrap();
        writer.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<DocumentItem> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0].content, "문단 하나 문단 둘");
    }
}
