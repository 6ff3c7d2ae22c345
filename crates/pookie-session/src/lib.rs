//! Pookie Session Management
//!
//! A session is the ordered set of open tabs, the active-tab pointer and the
//! view preferences around them. [`SessionStore`] is the only writer:
//! - every mutation is a no-op or a committed change, never an error
//! - observers run synchronously after each committed change
//! - persisted fields are written to one snapshot slot after each change
//! - [`SessionStore::load`] accepts stale or foreign snapshots and repairs them

mod error;
pub mod frame;
mod session;
mod snapshot;
mod store;
mod theme;

pub use error::SessionError;
pub use frame::{ContentFrame, EmbedAdvisory, FrameSync, FrameTarget, Navigation, TitleRead};
pub use session::{Session, DEFAULT_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH, MIN_SIDEBAR_WIDTH};
pub use snapshot::{decode_snapshot, encode_snapshot, SNAPSHOT_KEY};
pub use store::{SessionStore, SubscriptionId};
pub use theme::Theme;

pub use pookie_tabs::{NewTab, Tab, TabPatch, HOME_URL};

pub type Result<T> = std::result::Result<T, SessionError>;
