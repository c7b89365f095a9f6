//! 處理流程的各個階段
//!
//! 每個子模組負責一個階段，`job_orchestrator` 串接全部流程

pub mod contact_sheet_generator;
pub mod job_orchestrator;
pub mod manifest_builder;
pub mod media_normalizer;
pub mod metadata_extractor;
pub mod storage;
pub mod transcription;

pub use job_orchestrator::{JobOrchestrator, RunSummary};
pub use storage::{BlobStore, open_store};
pub use transcription::{Transcriber, WhisperClient};
