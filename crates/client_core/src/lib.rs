//! Client-side session and upload orchestration for JustStore.
//!
//! Two stores hold the observable state (session, upload). Each is owned and
//! written by exactly one orchestrator; presentation code reads snapshots or
//! subscribes to changes and dispatches user intents to the orchestrators.

pub mod auth_orchestrator;
pub mod callback;
pub mod collaborator;
pub mod http;
pub mod session;
pub mod settings;
pub mod store;
pub mod upload;
pub mod upload_orchestrator;

pub use auth_orchestrator::AuthOrchestrator;
pub use callback::{CallbackOutcome, PageEffect};
pub use collaborator::{
    AuthService, CollaboratorError, FileCatalog, Operation, UploadReceipt, UploadService,
};
pub use http::HttpCollaborator;
pub use session::{SessionState, SessionStatus};
pub use settings::{load_settings, ClientSettings};
pub use upload::{
    SelectedFile, UploadPhase, UploadRejection, UploadRequest, UploadState, UploadTicket,
};
pub use upload_orchestrator::UploadOrchestrator;
