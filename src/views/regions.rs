use askama::Template;
use axum::response::sse::Event;
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::pages::{HeroTemplate, MoviesTemplate, OverlayTemplate, TermTemplate, TrendingTemplate};
use crate::discovery::{Session, SessionStore, SessionView, TrendingState};

/// Rendered page regions, one per SSE event name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Regions {
    pub term: String,
    pub hero: String,
    pub trending: String,
    pub movies: String,
    pub overlay: String,
}

impl Regions {
    pub fn render(view: &SessionView) -> Self {
        let trending = match &view.trending {
            TrendingState::Ready(movies) => TrendingTemplate::new(movies),
            _ => TrendingTemplate::new(&[]),
        };

        Self {
            term: render(
                "term",
                &TermTemplate {
                    term: view.term.clone(),
                },
            ),
            hero: render("hero", &HeroTemplate::new(&view.hero)),
            trending: render("trending", &trending),
            movies: render("movies", &MoviesTemplate::new(&view.results)),
            overlay: render("overlay", &OverlayTemplate::new(&view.overlay)),
        }
    }

    fn named(&self) -> [(&'static str, &str); 5] {
        [
            ("term", self.term.as_str()),
            ("hero", self.hero.as_str()),
            ("trending", self.trending.as_str()),
            ("movies", self.movies.as_str()),
            ("overlay", self.overlay.as_str()),
        ]
    }

    /// Events for regions that differ from `previous`; all of them when `None`
    pub fn events(&self, previous: Option<&Regions>) -> Vec<Event> {
        let before = previous.map(Regions::named);
        self.named()
            .into_iter()
            .enumerate()
            .filter(|(i, (_, html))| before.is_none_or(|b| b[*i].1 != *html))
            .map(|(_, (name, html))| Event::default().event(name).data(html))
            .collect()
    }
}

/// Render a template, logging and blanking the region on failure.
///
/// Line endings are folded to `\n`: an SSE data line cannot carry a `\r`.
pub fn render<T: Template>(region: &str, template: &T) -> String {
    match template.render() {
        Ok(html) if html.contains('\r') => html.replace("\r\n", "\n").replace('\r', "\n"),
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to render {} region: {}", region, e);
            String::new()
        }
    }
}

/// How long an idle event stream waits before touching its session
pub const TOUCH_INTERVAL: Duration = Duration::from_secs(60);

/// Every region once, then whichever regions change after each revision.
///
/// The stream touches its entry in `sessions` on every revision and at least
/// every [`TOUCH_INTERVAL`], so a connected page keeps its session alive. It
/// ends once the session is gone from the store.
pub fn region_events(
    sessions: SessionStore,
    session: Arc<Session>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let changes = session.subscribe();

    stream::unfold(
        (sessions, session, changes, None::<Regions>),
        |(sessions, session, mut changes, previous)| async move {
            if previous.is_some() {
                loop {
                    match timeout(TOUCH_INTERVAL, changes.changed()).await {
                        Ok(Ok(())) => break,
                        Ok(Err(_)) => {
                            debug!("Session {} closed its change feed", session.id());
                            return None;
                        }
                        Err(_) => {
                            if !touch(&sessions, &session).await {
                                return None;
                            }
                        }
                    }
                }
            }
            changes.borrow_and_update();

            if !touch(&sessions, &session).await {
                return None;
            }

            let regions = Regions::render(&session.view());
            let events = regions.events(previous.as_ref());
            Some((
                stream::iter(events.into_iter().map(Ok)),
                (sessions, session, changes, Some(regions)),
            ))
        },
    )
    .flatten()
}

async fn touch(sessions: &SessionStore, session: &Session) -> bool {
    let alive = sessions.get(&session.id()).await.is_some();
    if !alive {
        debug!("Session {} expired, closing its event stream", session.id());
    }
    alive
}
