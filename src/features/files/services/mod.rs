mod file_service;

pub use file_service::{DownloadedFile, FileService, UploadedFile};
