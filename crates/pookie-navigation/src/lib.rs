//! Pookie Navigation
//!
//! Address bar input resolution:
//!   1. `http(s)://` or `about:` input → navigate as typed
//!   2. Bare domain (`example.com/path`) → navigate over https
//!   3. Anything else → search
//!
//! Also holds the fixed link list of the built-in start page.

mod error;
pub mod home;
mod input;

pub use error::NavigationError;
pub use home::{quick_links, HomeLink};
pub use input::{InputResolution, InputResolver, DEFAULT_SEARCH_TEMPLATE};

pub type Result<T> = std::result::Result<T, NavigationError>;
