//! Input resolution for address bar

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Default search engine (%s replaced with the encoded query)
pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://duckduckgo.com/?q=%s";

/// Characters `encodeURIComponent` leaves alone.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Result of resolving address bar input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResolution {
    /// Navigate to a URL
    Navigate(String),
    /// Search URL built from the input
    Search(String),
}

impl InputResolution {
    /// The URL to load, whichever way it was reached.
    pub fn url(&self) -> &str {
        match self {
            InputResolution::Navigate(url) | InputResolution::Search(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            InputResolution::Navigate(url) | InputResolution::Search(url) => url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputResolver {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Result<Self> {
        if !template.contains("%s") {
            return Err(NavigationError::InvalidSearchTemplate(template));
        }

        Ok(Self {
            search_template: template,
        })
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    /// Resolve user input into a URL. Blank input resolves to nothing.
    pub fn resolve(&self, raw: &str) -> Option<InputResolution> {
        let input = raw.trim();

        if input.is_empty() {
            return None;
        }

        let resolution = match self.try_parse_url(input) {
            Some(url) => InputResolution::Navigate(url),
            None => InputResolution::Search(self.build_search_url(raw)),
        };

        tracing::debug!(resolution = ?resolution, "Resolved address bar input");

        Some(resolution)
    }

    /// Navigable URL for `input`, if it is one.
    fn try_parse_url(&self, input: &str) -> Option<String> {
        let candidate = if has_scheme(input) {
            input.to_string()
        } else if looks_like_domain(input) {
            format!("https://{}", input)
        } else {
            return None;
        };

        Url::parse(&candidate).ok().map(|_| candidate)
    }

    /// Build search URL from query
    fn build_search_url(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, QUERY_COMPONENT).to_string();
        self.search_template.replace("%s", &encoded)
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// `http://`, `https://` (any case) or `about:`
fn has_scheme(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || input.starts_with("about:")
}

/// `label.label...tld`, tld of two or more letters, optionally followed by a
/// path or query.
fn looks_like_domain(input: &str) -> bool {
    let end = input.find(|c: char| c == '/' || c == '?').unwrap_or(input.len());
    let host = &input[..end];

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return false;
    }

    match host.rfind('.') {
        Some(dot) if dot > 0 => {
            let tld = &host[dot + 1..];
            tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}
