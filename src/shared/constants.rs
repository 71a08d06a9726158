/// Number of keyword stats returned by the frequent-keywords endpoint
/// when KEYWORD_TOP_N is not configured
pub const DEFAULT_KEYWORD_TOP_N: usize = 12;

/// Multipart field name carrying uploaded files
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Fallback MIME type when the client does not provide one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
