//! Tab creation seeds and partial updates

/// Fields a caller may choose when opening a tab. Anything left unset takes
/// the tab defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTab {
    pub title: Option<String>,
    pub url: Option<String>,
    pub incognito: bool,
}

impl NewTab {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn incognito(mut self, incognito: bool) -> Self {
        self.incognito = incognito;
        self
    }
}

/// A partial update merged into an existing tab. `None` leaves a field as is;
/// `favicon: Some(None)` clears the favicon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub favicon: Option<Option<String>>,
    pub incognito: Option<bool>,
}

impl TabPatch {
    /// Address-bar navigation: the URL doubles as the title until the page
    /// reports its own.
    pub fn navigate(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            title: Some(url.clone()),
            url: Some(url),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_favicon(mut self, favicon: Option<String>) -> Self {
        self.favicon = Some(favicon);
        self
    }

    pub fn with_incognito(mut self, incognito: bool) -> Self {
        self.incognito = Some(incognito);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.favicon.is_none()
            && self.incognito.is_none()
    }
}
