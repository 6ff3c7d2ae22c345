//! Pookie Tab Records
//!
//! A tab is one browsing context: an immutable identity plus the title, URL,
//! favicon and incognito flag that the session store mutates through patches.

mod patch;
mod tab;

pub use patch::{NewTab, TabPatch};
pub use tab::{new_tab_id, Tab, DEFAULT_TITLE, HOME_TITLE, HOME_URL};
