// Application layer - Use case interactors and the workflow session

pub mod container;
pub mod download_interactor;
pub mod session;
pub mod trim_interactor;
pub mod upload_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use download_interactor::DownloadCoordinator;
pub use session::{ControlsView, SessionPorts, WorkflowSession};
pub use trim_interactor::{TrimInteractor, TrimTicket, TrimWorkflow};
pub use upload_interactor::{UploadInteractor, UploadTicket, UploadWorkflow};
