//! 佇列處理流程
//!
//! 一次只處理一個項目，工作目錄在每個項目開始前重建、結束後清除。

mod main;
mod summary;
mod upload_target;
mod workspace;

pub use main::JobOrchestrator;
pub use summary::{FailedItem, JobOutcome, RunSummary};
pub use upload_target::{
    JobArtifacts, PROCESSED_FOLDER, PublishKey, UploadTarget, build_upload_targets,
    sanitize_base_name,
};
pub use workspace::Workspace;
