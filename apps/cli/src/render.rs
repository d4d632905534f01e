//! Text rendering of store snapshots.

use chrono::NaiveDateTime;
use client_core::{SelectedFile, SessionState, SessionStatus, UploadPhase, UploadState};
use shared::{domain::format_file_size, protocol::FileSummary};
use tokio::sync::watch;

pub fn session_line(state: &SessionState) -> String {
    let status = match state.status() {
        SessionStatus::Checking if state.is_logging_out() => "Disconnecting...",
        SessionStatus::Checking => "Checking...",
        SessionStatus::Authenticated => "YouTube: Connected",
        SessionStatus::Unauthenticated => "YouTube: Not connected",
    };
    match state.error() {
        Some(error) => format!("{status} (error: {error})"),
        None => status.to_string(),
    }
}

pub fn file_line(file: &SelectedFile) -> String {
    format!("Selected {} ({})", file.name, file.display_size())
}

pub fn file_summary_line(file: &FileSummary) -> String {
    let size = file
        .original_file_size_formatted
        .clone()
        .or_else(|| file.original_file_size_in_byte.map(format_file_size))
        .unwrap_or_else(|| "?".to_string());
    let created = file
        .created_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();
    let tags = if file.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", file.tags.join(", "))
    };
    format!(
        "#{:<5} {:<32} {:>10}  {:?}  {created}{tags}",
        file.id.0, file.original_file_name, size, file.status
    )
}

fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Prints a progress line whenever the upload enters the uploading phase.
pub async fn follow_uploads(mut updates: watch::Receiver<UploadState>) {
    while updates.changed().await.is_ok() {
        let phase = updates.borrow_and_update().phase();
        tracing::debug!(?phase, "upload state changed");
        if phase == UploadPhase::Uploading {
            eprintln!("Processing...");
        }
    }
}
