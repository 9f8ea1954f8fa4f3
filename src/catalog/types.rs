use serde::{Deserialize, Serialize};

use super::images::PLACEHOLDER_POSTER;

/// A movie as it appears in list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Average rating (0-10 scale)
    pub vote_average: Option<f64>,
    pub original_language: String,
    /// ISO date, e.g. `1999-03-31`
    pub release_date: Option<String>,
    pub overview: Option<String>,
    /// Resolved poster image, never empty
    pub poster_url: String,
}

impl MovieSummary {
    /// Create a summary with required fields; poster resolves to the placeholder
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
            original_language: String::new(),
            release_date: None,
            overview: None,
            poster_url: PLACEHOLDER_POSTER.to_string(),
        }
    }

    /// Builder pattern: set poster path and its resolved URL
    pub fn with_poster(mut self, path: Option<String>, url: impl Into<String>) -> Self {
        self.poster_path = path;
        self.poster_url = url.into();
        self
    }

    /// Builder pattern: set rating
    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.vote_average = rating;
        self
    }

    /// Builder pattern: set release date
    pub fn with_release_date(mut self, date: Option<String>) -> Self {
        self.release_date = date;
        self
    }

    /// Builder pattern: set original language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.original_language = language.into();
        self
    }

    /// Year part of the release date
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    /// Rating with one decimal, `N/A` when unrated
    #[must_use]
    pub fn rating_label(&self) -> String {
        self.vote_average
            .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}"))
    }
}

/// One page of list results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "type")]
    pub kind: String,
    pub site: String,
    pub key: String,
    pub name: Option<String>,
}

impl Video {
    #[must_use]
    pub fn is_youtube_trailer(&self) -> bool {
        self.kind == "Trailer" && self.site == "YouTube"
    }

    #[must_use]
    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.key)
    }
}

/// Extended metadata shown in the detail overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
    pub videos: Vec<Video>,
    pub backdrop_url: String,
}

impl MovieDetail {
    /// The first YouTube trailer, if any
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        self.videos.iter().find(|v| v.is_youtube_trailer())
    }
}
