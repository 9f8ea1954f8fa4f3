/// Local asset shown when a movie has no poster or backdrop
pub const PLACEHOLDER_POSTER: &str = "/static/no-movie.svg";
/// Local asset shown when a cast member has no profile picture
pub const PLACEHOLDER_PROFILE: &str = "/static/no-profile.svg";

/// Image CDN size segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W185,
    W500,
    Original,
}

impl ImageSize {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::W185 => "w185",
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// Resolves catalog-relative image paths against the CDN
#[derive(Debug, Clone)]
pub struct ImageCdn {
    base_url: String,
}

impl ImageCdn {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// CDN URL for a path, `None` when the path is absent or blank
    #[must_use]
    pub fn url(&self, path: Option<&str>, size: ImageSize) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        let separator = if path.starts_with('/') { "" } else { "/" };
        Some(format!(
            "{}/{}{separator}{path}",
            self.base_url,
            size.segment()
        ))
    }

    /// Poster URL at card size, or the local placeholder
    #[must_use]
    pub fn poster(&self, path: Option<&str>) -> String {
        self.url(path, ImageSize::W500)
            .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string())
    }

    /// Full-resolution backdrop URL, or the local placeholder
    #[must_use]
    pub fn backdrop(&self, path: Option<&str>) -> String {
        self.url(path, ImageSize::Original)
            .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string())
    }

    /// Cast portrait URL, or the local placeholder
    #[must_use]
    pub fn profile(&self, path: Option<&str>) -> String {
        self.url(path, ImageSize::W185)
            .unwrap_or_else(|| PLACEHOLDER_PROFILE.to_string())
    }
}
