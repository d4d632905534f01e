use super::*;
use client_core::{Operation, SessionStatus, UploadRejection};

fn parse_upload(args: &[&str]) -> UploadRequest {
    let cli = Cli::try_parse_from(args).expect("parse");
    match cli.command {
        Command::Upload {
            encrypt,
            secret_key,
            tags,
            ..
        } => upload_request(
            SelectedFile::new("f.bin", vec![1, 2, 3]),
            encrypt,
            secret_key,
            tags,
        ),
        other => panic!("expected upload command, got {other:?}"),
    }
}

#[test]
fn secret_key_alone_enables_encryption() {
    let request = parse_upload(&["juststore", "upload", "f.bin", "--secret-key", "hunter2"]);

    assert!(request.encrypt);
    assert_eq!(request.secret_key(), Some("hunter2"));
    assert!(request.validate(SessionStatus::Authenticated).is_ok());
}

#[test]
fn encrypt_without_key_is_rejected() {
    let request = parse_upload(&["juststore", "upload", "f.bin", "--encrypt"]);

    assert_eq!(
        request.validate(SessionStatus::Authenticated),
        Err(UploadRejection::SecretKeyRequired)
    );
}

#[test]
fn plain_upload_sends_no_key_and_keeps_tags() {
    let request = parse_upload(&[
        "juststore", "upload", "f.bin", "--tag", "work", "--tag", "2024",
    ]);

    assert!(!request.encrypt);
    assert_eq!(request.secret_key(), None);
    assert_eq!(request.tags, vec!["work".to_string(), "2024".to_string()]);
}

#[test]
fn unauthorized_failure_suggests_login() {
    let err = explain(CollaboratorError::remote(
        Operation::ListFiles,
        401,
        "Please authenticate with YouTube first",
    ));
    let text = err.to_string();
    assert!(text.starts_with("Please authenticate with YouTube first"));
    assert!(text.contains("juststore login"));

    let err = explain(CollaboratorError::remote(Operation::ListFiles, 500, "boom"));
    assert_eq!(err.to_string(), "boom");
}
