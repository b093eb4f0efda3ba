//! Ingest Router Lambda: classifies uploaded documents and queues a summary on the
//! high-priority or normal channel.

pub mod event;
pub mod handler;
pub mod process;

pub use handler::handler;
pub use process::{AnalyzedDocument, BatchReport, IngestRouter, SOURCE_LANGUAGE};
