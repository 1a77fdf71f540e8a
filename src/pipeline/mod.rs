//! Item pipeline: sinks consuming the emitted document stream
//!
//! The orchestrator hands each [`DocumentItem`](crate::item::DocumentItem)
//! to an [`ItemSink`] the moment it is built, so writers stream and the
//! run never buffers more than one page's entries. Sinks compose by
//! decoration: the attachment downloader wraps whatever writer sits
//! behind it.

mod files;
mod json_writer;

pub use files::FileDownloadSink;
pub use json_writer::JsonArrayWriter;

use crate::item::DocumentItem;
use thiserror::Error;

/// Errors that can occur while persisting items
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write item: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize item: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Download error: {0}")]
    Download(String),
}

/// A consumer of the emitted item stream.
///
/// `process` is called once per item in emission order; `close` exactly
/// once after the run, even for an empty run.
#[allow(async_fn_in_trait)]
pub trait ItemSink {
    async fn process(&mut self, item: DocumentItem) -> Result<(), SinkError>;

    async fn close(&mut self) -> Result<(), SinkError>;
}
