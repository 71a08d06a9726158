mod file_dto;

pub use file_dto::{DownloadBatchRequestDto, FileRecordDto, UploadFormDto, UploadResponseDto};
