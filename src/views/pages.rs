//! Templates and the view models they render

use askama::Template;

use crate::catalog::{MovieDetail, MovieSummary};
use crate::discovery::{Hero, ListPhase, ListState, OverlayState};

/// Skeleton cards shown while the first page loads
pub const SKELETON_COUNT: usize = 12;
/// Cast members shown in the overlay
pub const TOP_CAST: usize = 5;

const NOT_AVAILABLE: &str = "N/A";

/// One result card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: i64,
    pub title: String,
    pub poster_url: String,
    pub rating: String,
    pub language: String,
    pub year: String,
}

impl From<&MovieSummary> for CardView {
    fn from(movie: &MovieSummary) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
            rating: movie.rating_label(),
            language: movie.original_language.clone(),
            year: movie.release_year().unwrap_or(NOT_AVAILABLE).to_string(),
        }
    }
}

/// Trending strip entry
#[derive(Debug, Clone)]
pub struct RankView {
    pub rank: usize,
    pub id: i64,
    pub title: String,
    pub poster_url: String,
}

#[derive(Debug, Clone)]
pub struct PosterView {
    pub title: String,
    pub poster_url: String,
}

impl From<&MovieSummary> for PosterView {
    fn from(movie: &MovieSummary) -> Self {
        Self {
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CastView {
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub title: String,
    pub year: String,
    pub runtime: String,
    pub rating: String,
    pub genres: Vec<String>,
    pub overview: String,
    pub poster_url: String,
    pub backdrop_url: String,
    pub cast: Vec<CastView>,
    pub trailer_url: Option<String>,
}

impl From<&MovieDetail> for DetailView {
    fn from(detail: &MovieDetail) -> Self {
        let movie = &detail.summary;
        Self {
            title: movie.title.clone(),
            year: movie.release_year().unwrap_or(NOT_AVAILABLE).to_string(),
            runtime: detail
                .runtime
                .map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{m} min")),
            rating: movie.rating_label(),
            genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
            overview: movie.overview.clone().unwrap_or_default(),
            poster_url: movie.poster_url.clone(),
            backdrop_url: detail.backdrop_url.clone(),
            cast: detail
                .cast
                .iter()
                .take(TOP_CAST)
                .map(|c| CastView {
                    name: c.name.clone(),
                    character: c.character.clone().unwrap_or_default(),
                    profile_url: c.profile_url.clone(),
                })
                .collect(),
            trailer_url: detail.trailer().map(|v| v.embed_url()),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub term: String,
    pub term_html: String,
    pub hero_html: String,
    pub trending_html: String,
    pub movies_html: String,
    pub overlay_html: String,
}

#[derive(Template)]
#[template(path = "regions/term.html")]
pub struct TermTemplate {
    pub term: String,
}

#[derive(Template)]
#[template(path = "regions/hero.html")]
pub struct HeroTemplate {
    pub placeholder: bool,
    pub left: Option<PosterView>,
    pub center: Option<PosterView>,
    pub right: Option<PosterView>,
}

impl HeroTemplate {
    pub fn new(hero: &Hero) -> Self {
        match hero {
            Hero::Placeholder => Self {
                placeholder: true,
                left: None,
                center: None,
                right: None,
            },
            Hero::Banner => Self {
                placeholder: false,
                left: None,
                center: None,
                right: None,
            },
            Hero::Composite {
                left,
                center,
                right,
            } => Self {
                placeholder: false,
                left: left.as_ref().map(PosterView::from),
                center: center.as_ref().map(PosterView::from),
                right: right.as_ref().map(PosterView::from),
            },
        }
    }

    /// Static banner: neither spinner nor any poster
    pub fn is_banner(&self) -> bool {
        !self.placeholder && self.left.is_none() && self.center.is_none() && self.right.is_none()
    }
}

#[derive(Template)]
#[template(path = "regions/trending.html")]
pub struct TrendingTemplate {
    pub movies: Vec<RankView>,
}

impl TrendingTemplate {
    pub fn new(movies: &[MovieSummary]) -> Self {
        Self {
            movies: movies
                .iter()
                .enumerate()
                .map(|(i, m)| RankView {
                    rank: i + 1,
                    id: m.id,
                    title: m.title.clone(),
                    poster_url: m.poster_url.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "regions/movies.html")]
pub struct MoviesTemplate {
    pub loading: bool,
    pub skeletons: Vec<usize>,
    pub error: Option<String>,
    pub cards: Vec<CardView>,
    pub loading_more: bool,
    pub can_load_more: bool,
}

impl MoviesTemplate {
    pub fn new(state: &ListState) -> Self {
        let loading = state.phase == ListPhase::Loading;
        Self {
            loading,
            skeletons: if loading {
                (0..SKELETON_COUNT).collect()
            } else {
                Vec::new()
            },
            error: state.error.clone(),
            cards: state.movies.iter().map(CardView::from).collect(),
            loading_more: state.loading_more,
            can_load_more: state.can_load_more(),
        }
    }
}

#[derive(Template)]
#[template(path = "regions/overlay.html")]
pub struct OverlayTemplate {
    pub open: bool,
    pub loading: bool,
    pub title: String,
    pub error: Option<String>,
    pub detail: Option<DetailView>,
}

impl OverlayTemplate {
    pub fn new(state: &OverlayState) -> Self {
        let closed = Self {
            open: false,
            loading: false,
            title: String::new(),
            error: None,
            detail: None,
        };

        match state {
            OverlayState::Closed => closed,
            OverlayState::Loading { movie } => Self {
                open: true,
                loading: true,
                title: movie.title.clone(),
                ..closed
            },
            OverlayState::Ready { detail } => Self {
                open: true,
                title: detail.summary.title.clone(),
                detail: Some(DetailView::from(detail.as_ref())),
                ..closed
            },
            OverlayState::Failed { movie, message } => Self {
                open: true,
                title: movie.title.clone(),
                error: Some(message.clone()),
                ..closed
            },
        }
    }
}
