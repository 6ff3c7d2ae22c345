//! Pookie Core
//!
//! Wires the shell together: one [`Browser`] per process owns the session
//! store, the frame title sync and the address bar resolver, and hands them
//! to the host UI.

mod browser;
mod config;
mod error;

pub use browser::Browser;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use pookie_navigation::{quick_links, HomeLink, InputResolution, InputResolver, NavigationError};
pub use pookie_session::{
    ContentFrame, EmbedAdvisory, FrameSync, FrameTarget, Navigation, Session, SessionStore,
    SubscriptionId, Theme, TitleRead,
};
pub use pookie_storage::{Database, MemoryStore, SnapshotStore, StorageError};
pub use pookie_tabs::{NewTab, Tab, TabPatch, HOME_URL};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
