use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(FileId);

/// Lifecycle of a stored file on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    Pending,
    Uploaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthProvider {
    #[default]
    Youtube,
}

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count as "2.50 MB" using binary (1024) steps.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.2} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_bytes_without_decimals() {
        assert_eq!(format_file_size(0), "0 B");
    }

    #[test]
    fn formats_sizes_with_two_decimals() {
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(2_621_440), "2.50 MB");
        assert_eq!(format_file_size(1024_u64.pow(5) * 3), "3072.00 TB");
    }

    #[test]
    fn file_status_uses_server_casing() {
        let status: FileStatus = serde_json::from_str("\"UPLOADED\"").expect("status");
        assert_eq!(status, FileStatus::Uploaded);
    }
}
