//! Fakes shared by unit tests.

use crate::catalog::{
    CastMember, Catalog, CatalogError, Genre, MovieDetail, MoviePage, MovieSummary, Result, Video,
};
use crate::recorder::{self, SearchCount, UsageRecorder};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Simulated latency for queries prefixed with `slow` and movie id 7
pub const SLOW: Duration = Duration::from_secs(1);
pub const PAGES: u32 = 3;

/// Scripted catalog.
///
/// Queries: `broken` is rejected, `offline` fails with 500, `nothing` has no
/// results, `flaky` fails on page 2, `flaky-reject` is rejected on page 2,
/// anything starting with `slow` answers after [`SLOW`]. Everything else
/// returns two movies per page over [`PAGES`] pages.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<(String, u32)>>,
    trending_calls: AtomicUsize,
    trending_size: Option<usize>,
    trending_fails: AtomicBool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trending_size(size: usize) -> Self {
        Self {
            trending_size: Some(size),
            ..Default::default()
        }
    }

    pub fn failing_trending() -> Self {
        let catalog = Self::default();
        catalog.trending_fails.store(true, Ordering::SeqCst);
        catalog
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }

    pub fn trending_calls(&self) -> usize {
        self.trending_calls.load(Ordering::SeqCst)
    }

    pub fn movie(id: i64, title: impl Into<String>) -> MovieSummary {
        MovieSummary::new(id, title)
            .with_rating(Some(7.5))
            .with_language("en")
            .with_release_date(Some("2021-09-15".to_string()))
    }

    fn page(query: &str, page: u32) -> MoviePage {
        let label = if query.is_empty() { "popular" } else { query };
        MoviePage {
            page,
            total_pages: PAGES,
            total_results: PAGES * 2,
            results: (1..=2)
                .map(|i| Self::movie(i64::from(page) * 100 + i, format!("{label} {page}-{i}")))
                .collect(),
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn discover(&self, page: u32) -> Result<MoviePage> {
        self.calls.lock().push((String::new(), page));
        Ok(Self::page("", page))
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage> {
        self.calls.lock().push((query.to_string(), page));

        if query.starts_with("slow") {
            tokio::time::sleep(SLOW).await;
        }

        match (query, page) {
            ("broken", _) => Err(CatalogError::Rejected("Movie not found!".to_string())),
            ("offline", _) => Err(CatalogError::Api {
                status: 500,
                message: "upstream down".to_string(),
            }),
            ("nothing", _) => Ok(MoviePage {
                page: 1,
                total_pages: 1,
                total_results: 0,
                results: Vec::new(),
            }),
            ("flaky", 2) => Err(CatalogError::Api {
                status: 503,
                message: "busy".to_string(),
            }),
            ("flaky-reject", 2) => Err(CatalogError::Rejected("Invalid page".to_string())),
            _ => Ok(Self::page(query, page)),
        }
    }

    async fn trending(&self) -> Result<Vec<MovieSummary>> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        if self.trending_fails.load(Ordering::SeqCst) {
            return Err(CatalogError::Api {
                status: 500,
                message: "trending down".to_string(),
            });
        }

        let size = self.trending_size.unwrap_or(7);
        Ok((1..=size as i64)
            .map(|i| Self::movie(900 + i, format!("Trend {i}")))
            .collect())
    }

    async fn details(&self, id: i64) -> Result<MovieDetail> {
        if id == 7 {
            tokio::time::sleep(SLOW).await;
        }

        match id {
            404 => Err(CatalogError::NotFound(format!("movie {id}"))),
            500 => Err(CatalogError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
            _ => Ok(MovieDetail {
                summary: Self::movie(id, format!("Movie {id}")),
                runtime: Some(120),
                genres: vec![Genre {
                    id: 18,
                    name: "Drama".to_string(),
                }],
                cast: vec![CastMember {
                    id: 1,
                    name: "Lead".to_string(),
                    character: Some("Hero".to_string()),
                    profile_path: None,
                    profile_url: crate::catalog::PLACEHOLDER_PROFILE.to_string(),
                }],
                videos: vec![Video {
                    kind: "Trailer".to_string(),
                    site: "YouTube".to_string(),
                    key: format!("key{id}"),
                    name: None,
                }],
                backdrop_url: crate::catalog::PLACEHOLDER_POSTER.to_string(),
            }),
        }
    }
}

/// Recorder that reports every call on a channel
pub struct ChannelRecorder {
    tx: mpsc::UnboundedSender<(String, i64, String)>,
}

impl ChannelRecorder {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, i64, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl UsageRecorder for ChannelRecorder {
    fn id(&self) -> &'static str {
        "channel"
    }

    async fn record(&self, query: &str, movie: &MovieSummary) -> recorder::Result<SearchCount> {
        let _ = self
            .tx
            .send((query.to_string(), movie.id, movie.title.clone()));
        Ok(SearchCount {
            query: query.to_string(),
            count: 1,
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            updated_at: None,
        })
    }

    async fn top(&self, _limit: usize) -> recorder::Result<Vec<SearchCount>> {
        Ok(Vec::new())
    }
}

/// Let spawned tasks run to their next await point
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
