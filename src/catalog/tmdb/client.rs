use super::api_types::{MovieDetails, MovieResult, PageResponse};
use crate::catalog::{
    Catalog, CatalogConfig, CatalogError, HttpClient, ImageCdn, Result,
    types::{CastMember, Genre, MovieDetail, MoviePage, MovieSummary, Video},
};
use async_trait::async_trait;
use tracing::debug;

/// Read endpoints of the catalog API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Discover { page: u32 },
    Search { query: String, page: u32 },
    Trending,
    Details { id: i64 },
}

impl Endpoint {
    /// Path and query string relative to the API root
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Discover { page } => {
                format!("/discover/movie?sort_by=popularity.desc&page={page}")
            }
            Self::Search { query, page } => format!(
                "/search/movie?query={}&page={page}",
                urlencoding::encode(query)
            ),
            Self::Trending => "/trending/movie/week".to_string(),
            Self::Details { id } => {
                format!("/movie/{id}?append_to_response=credits,videos")
            }
        }
    }
}

/// TMDB-backed catalog
pub struct TmdbCatalog {
    client: HttpClient,
    images: ImageCdn,
}

impl TmdbCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            images: ImageCdn::new(&config.image_base_url),
        })
    }

    async fn fetch_page(&self, endpoint: &Endpoint) -> Result<MoviePage> {
        let response: PageResponse = self.client.get(&endpoint.path()).await?;

        if let Some(message) = response.failure.rejection() {
            debug!("Catalog rejected {:?}: {}", endpoint, message);
            return Err(CatalogError::Rejected(message));
        }

        Ok(MoviePage {
            page: response.page,
            total_pages: response.total_pages,
            total_results: response.total_results,
            results: response
                .results
                .into_iter()
                .map(|m| self.movie_result_to_summary(m))
                .collect(),
        })
    }

    fn movie_result_to_summary(&self, movie: MovieResult) -> MovieSummary {
        let poster_url = self.images.poster(movie.poster_path.as_deref());

        MovieSummary {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average,
            original_language: movie.original_language,
            release_date: movie.release_date,
            overview: movie.overview,
            poster_url,
        }
    }

    fn details_to_detail(&self, movie: MovieDetails) -> MovieDetail {
        let poster_url = self.images.poster(movie.poster_path.as_deref());
        let backdrop_url = self.images.backdrop(movie.backdrop_path.as_deref());

        let cast = movie
            .credits
            .map(|c| c.cast)
            .unwrap_or_default()
            .into_iter()
            .map(|c| CastMember {
                id: c.id,
                profile_url: self.images.profile(c.profile_path.as_deref()),
                name: c.name,
                character: c.character,
                profile_path: c.profile_path,
            })
            .collect();

        let videos = movie
            .videos
            .map(|v| v.results)
            .unwrap_or_default()
            .into_iter()
            .map(|v| Video {
                kind: v.kind,
                site: v.site,
                key: v.key,
                name: v.name,
            })
            .collect();

        MovieDetail {
            summary: MovieSummary {
                id: movie.id,
                title: movie.title,
                poster_path: movie.poster_path,
                backdrop_path: movie.backdrop_path,
                vote_average: movie.vote_average,
                original_language: movie.original_language,
                release_date: movie.release_date,
                overview: movie.overview,
                poster_url,
            },
            runtime: movie.runtime,
            genres: movie
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            cast,
            videos,
            backdrop_url,
        }
    }
}

#[async_trait]
impl Catalog for TmdbCatalog {
    fn id(&self) -> &'static str {
        "tmdb"
    }

    async fn discover(&self, page: u32) -> Result<MoviePage> {
        self.fetch_page(&Endpoint::Discover { page }).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage> {
        self.fetch_page(&Endpoint::Search {
            query: query.to_string(),
            page,
        })
        .await
    }

    async fn trending(&self) -> Result<Vec<MovieSummary>> {
        Ok(self.fetch_page(&Endpoint::Trending).await?.results)
    }

    async fn details(&self, id: i64) -> Result<MovieDetail> {
        let endpoint = Endpoint::Details { id };
        let movie: MovieDetails = self.client.get(&endpoint.path()).await.map_err(|e| match e {
            CatalogError::Api { status: 404, .. } => {
                CatalogError::NotFound(format!("movie {id}"))
            }
            other => other,
        })?;

        if let Some(message) = movie.failure.rejection() {
            return Err(CatalogError::Rejected(message));
        }

        Ok(self.details_to_detail(movie))
    }
}
