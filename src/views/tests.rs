use askama::Template;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use super::SESSION_COOKIE;
use super::pages::{
    CardView, HeroTemplate, MoviesTemplate, OverlayTemplate, TermTemplate, TrendingTemplate,
};
use super::regions::{Regions, region_events, render};
use crate::catalog::{CastMember, Catalog, MovieSummary};
use crate::config::AppConfig;
use crate::discovery::{Changes, DiscoveryOptions, Hero, OverlayState, ResultList, SessionStore};
use crate::test_utils::FakeCatalog;
use crate::{Ctx, app};

#[test]
fn test_card_fallbacks() {
    let card = CardView::from(&MovieSummary::new(1, "Untitled"));
    assert_eq!(card.rating, "N/A");
    assert_eq!(card.year, "N/A");
    assert_eq!(card.poster_url, "/static/no-movie.svg");

    let card = CardView::from(&FakeCatalog::movie(2, "Dune"));
    assert_eq!(card.rating, "7.5");
    assert_eq!(card.year, "2021");
    assert_eq!(card.language, "en");
}

#[tokio::test]
async fn test_movies_region_while_loading() {
    let list = ResultList::new(Arc::new(FakeCatalog::new()), None, Changes::new());
    list.begin_first_page("dune");

    let html = MoviesTemplate::new(&list.snapshot()).render().unwrap();
    assert_eq!(html.matches("skeleton-card").count(), 12);
    assert!(!html.contains("Load More"));
}

#[tokio::test]
async fn test_movies_region_loaded() {
    let list = ResultList::new(Arc::new(FakeCatalog::new()), None, Changes::new());
    list.load_first_page("dune").await;

    let html = MoviesTemplate::new(&list.snapshot()).render().unwrap();
    assert_eq!(html.matches("class=\"movie-card\"").count(), 2);
    assert!(html.contains("dune 1-1"));
    assert!(html.contains("hx-post=\"/select/101\""));
    assert!(html.contains("Load More"));
    assert!(!html.contains("skeleton-card"));
}

#[test]
fn test_movies_region_error_and_spinner() {
    let template = MoviesTemplate {
        loading: false,
        skeletons: Vec::new(),
        error: Some("Movie not found!".to_string()),
        cards: Vec::new(),
        loading_more: false,
        can_load_more: false,
    };
    let html = template.render().unwrap();
    assert!(html.contains("Movie not found!"));
    assert!(!html.contains("movie-card"));
    assert!(!html.contains("Load More"));

    let template = MoviesTemplate {
        loading: false,
        skeletons: Vec::new(),
        error: None,
        cards: vec![CardView::from(&FakeCatalog::movie(1, "Alien"))],
        loading_more: true,
        can_load_more: false,
    };
    let html = template.render().unwrap();
    assert!(html.contains("spinner"));
    assert!(!html.contains("Load More"));
}

#[test]
fn test_hero_variants() {
    let html = HeroTemplate::new(&Hero::Placeholder).render().unwrap();
    assert!(html.contains("spinner"));

    let banner = HeroTemplate::new(&Hero::Banner);
    assert!(banner.is_banner());
    assert!(banner.render().unwrap().contains("/static/hero.svg"));

    let html = HeroTemplate::new(&Hero::Composite {
        left: Some(FakeCatalog::movie(2, "Second")),
        center: Some(FakeCatalog::movie(1, "First")),
        right: Some(FakeCatalog::movie(3, "Third")),
    })
    .render()
    .unwrap();
    let left = html.find("alt=\"Second\"").unwrap();
    let center = html.find("alt=\"First\"").unwrap();
    let right = html.find("alt=\"Third\"").unwrap();
    assert!(left < center && center < right);
    assert!(!html.contains("hero.svg"));
}

#[test]
fn test_trending_ranks() {
    let movies: Vec<_> = (1..=3)
        .map(|i| FakeCatalog::movie(900 + i, format!("Trend {i}")))
        .collect();
    let html = TrendingTemplate::new(&movies).render().unwrap();
    assert!(html.contains("Trending Movies"));
    assert!(html.contains("<p>3</p>"));

    let html = TrendingTemplate::new(&[]).render().unwrap();
    assert!(html.trim().is_empty());
}

#[tokio::test]
async fn test_overlay_detail() {
    let mut detail = FakeCatalog::new().details(42).await.unwrap();
    detail.cast = (1..=7)
        .map(|i| CastMember {
            id: i,
            name: format!("Actor {i}"),
            character: None,
            profile_path: None,
            profile_url: "/static/no-profile.svg".to_string(),
        })
        .collect();

    let html = OverlayTemplate::new(&OverlayState::Ready {
        detail: Box::new(detail),
    })
    .render()
    .unwrap();
    assert_eq!(html.matches("class=\"cast-member\"").count(), 5);
    assert!(!html.contains("Actor 6"));
    assert!(html.contains("<iframe"));
    assert!(html.contains("key42"));
    assert!(html.contains("120 min"));
    assert!(html.contains("Drama"));
}

#[test]
fn test_overlay_states() {
    let html = OverlayTemplate::new(&OverlayState::Closed).render().unwrap();
    assert!(html.trim().is_empty());

    let movie = FakeCatalog::movie(7, "Slow");
    let html = OverlayTemplate::new(&OverlayState::Loading {
        movie: movie.clone(),
    })
    .render()
    .unwrap();
    assert!(html.contains("spinner"));

    let html = OverlayTemplate::new(&OverlayState::Failed {
        movie,
        message: "This movie is no longer available.".to_string(),
    })
    .render()
    .unwrap();
    assert!(html.contains("This movie is no longer available."));
    assert!(html.contains("Slow"));
}

fn ctx() -> Ctx {
    Ctx::new(AppConfig::default(), Arc::new(FakeCatalog::new()), None)
}

#[tokio::test(start_paused = true)]
async fn test_regions_only_emit_changes() {
    let ctx = ctx();
    let session = ctx.sessions.create().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let first = Regions::render(&session.view());
    assert_eq!(first.events(None).len(), 5);
    assert!(first.events(Some(&first)).is_empty());

    session.input("dune");
    let second = Regions::render(&session.view());
    assert_eq!(second.events(Some(&first)).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_carriage_returns_folded_for_events() {
    let ctx = ctx();
    let session = ctx.sessions.create().await;
    session.input("dune\r\npart two");
    let regions = Regions::render(&session.view());
    assert!(!regions.term.contains('\r'));
    assert_eq!(regions.events(None).len(), 5);

    let mut detail = FakeCatalog::new().details(42).await.unwrap();
    detail.summary.overview = Some("A desert planet.\r\nA spice war.\rThe end.".to_string());
    let overlay = render(
        "overlay",
        &OverlayTemplate::new(&OverlayState::Ready {
            detail: Box::new(detail),
        }),
    );
    assert!(!overlay.contains('\r'));
    assert!(overlay.contains("A spice war.\nThe end."));

    let regions = Regions {
        term: render(
            "term",
            &TermTemplate {
                term: "dune\r\npart two".to_string(),
            },
        ),
        overlay,
        ..Regions::default()
    };
    assert_eq!(regions.events(None).len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_event_stream_ends_when_session_evicted() {
    let ctx = ctx();
    let session = ctx.sessions.create().await;
    let mut stream = Box::pin(region_events(ctx.sessions.clone(), session.clone()));
    for _ in 0..5 {
        assert!(stream.next().await.is_some());
    }

    ctx.sessions.remove(&session.id()).await;
    session.input("dune");
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_event_stream_keeps_session_alive() {
    let sessions = SessionStore::new(
        Arc::new(FakeCatalog::new()),
        None,
        DiscoveryOptions::default(),
        100,
        Duration::from_millis(500),
    );
    let session = sessions.create().await;
    let mut stream = Box::pin(region_events(sessions.clone(), session.clone()));
    for _ in 0..5 {
        assert!(stream.next().await.is_some());
    }

    for term in ["d", "du", "dun"] {
        tokio::time::sleep(Duration::from_millis(300)).await;
        session.input(term);
        assert!(stream.next().await.is_some());
    }
    assert!(sessions.get(&session.id()).await.is_some());
}

fn session_cookie(response: &axum::response::Response) -> String {
    let value = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    value.split(';').next().unwrap().to_string()
}

#[tokio::test(start_paused = true)]
async fn test_index_sets_session_cookie() {
    let router = app(ctx());
    let response = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with(SESSION_COOKIE));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("All Movies"));
    assert!(html.contains("sse-connect=\"/events\""));
}

#[tokio::test(start_paused = true)]
async fn test_interactions_need_session() {
    let router = app(ctx());
    let response = router
        .clone()
        .oneshot(
            Request::post("/search")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("term=dune"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(start_paused = true)]
async fn test_interactions_return_no_content() {
    let router = app(ctx());
    let response = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let post = |uri: &str, body: &'static str| {
        Request::post(uri)
            .header(header::COOKIE, cookie.clone())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    };

    let response = router.clone().oneshot(post("/search", "term=dune")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.clone().oneshot(post("/more", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.clone().oneshot(post("/select/101", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.clone().oneshot(post("/select/999999", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router.clone().oneshot(post("/close", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test(start_paused = true)]
async fn test_events_send_every_region_on_connect() {
    let router = app(ctx());
    let response = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = router
        .oneshot(
            Request::get("/events")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();
    while !["term", "hero", "trending", "movies", "overlay"]
        .iter()
        .all(|name| seen.contains(&format!("event: {name}")))
    {
        let chunk = body.next().await.unwrap().unwrap();
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
}
