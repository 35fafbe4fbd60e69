pub mod upload;

pub use upload::{UploadListCommand, UploadListError, UploadListResponse};
