//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Search template must contain %s: {0}")]
    InvalidSearchTemplate(String),
}
