use serde::{Deserialize, Deserializer};

use crate::catalog::FALLBACK_REJECTION;

// List responses
#[derive(Debug, Deserialize)]
pub struct PageResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<MovieResult>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    #[serde(flatten)]
    pub failure: FailureFields,
}

/// A `null` list reads as empty, same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields a 2xx body may use to report a logical failure
#[derive(Debug, Default, Deserialize)]
pub struct FailureFields {
    #[serde(rename = "Response")]
    pub response: Option<String>,
    pub error: Option<String>,
    pub success: Option<bool>,
    pub status_message: Option<String>,
}

impl FailureFields {
    /// The failure message when the body signals one
    pub fn rejection(&self) -> Option<String> {
        let failed = self.response.as_deref() == Some("False") || self.success == Some(false);
        if !failed {
            return None;
        }

        Some(
            self.error
                .clone()
                .or_else(|| self.status_message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_REJECTION.to_string()),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieResult {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: String,
}

// Detail responses
#[derive(Debug, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Genre>,
    pub credits: Option<Credits>,
    pub videos: Option<Videos>,
    #[serde(flatten)]
    pub failure: FailureFields,
}

#[derive(Debug, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Videos {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<VideoResult>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub site: String,
    pub key: String,
    pub name: Option<String>,
}
