pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notification;
pub mod reports;
pub mod resource;
pub mod schema;
pub mod utils;
pub mod wizard;

// Re-export commonly used types for easier access
pub use auth::{Authenticator, DemoAuthenticator, Role, Session};
pub use backend::{DataAccess, HttpDataAccess, InMemoryStore};
pub use error::{AppError, AppResult};
pub use wizard::{Field, IntakeWizard, Step, StepOutcome};
