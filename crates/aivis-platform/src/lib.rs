//! Sessions and query transport for AI answer platforms.
//!
//! Login flows run through the [`AuthProvider`] capability trait so the rest
//! of the system never touches the underlying browser automation service.
//! [`SessionManager`] owns one session per platform per run; [`PlatformClient`]
//! performs single-attempt queries and reports failures as data rather than
//! errors, so one bad platform never aborts a visibility run.

pub mod client;
pub mod error;
pub mod provider;
pub mod session;
pub mod types;

pub use client::PlatformClient;
pub use error::PlatformError;
pub use provider::{AuthProvider, ScriptedAuthProvider, SessionHandle};
pub use session::{Session, SessionManager};
pub use types::{QueryRequest, QueryResult, DEFAULT_QUERY_TIMEOUT};
