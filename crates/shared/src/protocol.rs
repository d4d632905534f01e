use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthProvider, FileId, FileStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(default)]
    pub provider: AuthProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUrlResponse {
    pub auth_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
}

/// Body returned by `POST /upload`.
///
/// Older deployments only report the hosted video location, so every field
/// is optional and the caller decides which one identifies the stored file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(
        default,
        alias = "videoPath",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: FileId,
    pub original_file_name: String,
    #[serde(default)]
    pub original_file_size_formatted: Option<String>,
    #[serde(default)]
    pub original_file_size_in_byte: Option<u64>,
    #[serde(default)]
    pub original_file_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: FileStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Filters accepted by `GET /files/search`. Empty filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl FileSearchQuery {
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none()
            && self.tag.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}
