use crate::catalog::MovieSummary;
use crate::recorder::{Result, SearchCount, UsageRecorder};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

/// In-process recorder; counts live as long as the process
#[derive(Default)]
pub struct MemoryRecorder {
    counts: DashMap<String, SearchCount>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for a query
    pub fn get(&self, query: &str) -> Option<SearchCount> {
        self.counts.get(query).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[async_trait]
impl UsageRecorder for MemoryRecorder {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn record(&self, query: &str, movie: &MovieSummary) -> Result<SearchCount> {
        let now = Utc::now();
        let mut entry = self
            .counts
            .entry(query.to_string())
            .and_modify(|record| record.count += 1)
            .or_insert_with(|| SearchCount {
                query: query.to_string(),
                count: 1,
                movie_id: movie.id,
                title: movie.title.clone(),
                poster_path: movie.poster_path.clone(),
                updated_at: None,
            });
        entry.updated_at = Some(now);

        Ok(entry.value().clone())
    }

    async fn top(&self, limit: usize) -> Result<Vec<SearchCount>> {
        let mut records: Vec<SearchCount> =
            self.counts.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_record_creates_counter() {
        let recorder = MemoryRecorder::new();
        let movie = MovieSummary::new(438631, "Dune");

        let record = recorder.record("dune", &movie).await.unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(record.movie_id, 438631);
        assert_eq!(record.title, "Dune");
        assert!(record.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_repeat_increments_and_keeps_first_movie() {
        let recorder = MemoryRecorder::new();
        recorder
            .record("dune", &MovieSummary::new(1, "Dune"))
            .await
            .unwrap();
        let record = recorder
            .record("dune", &MovieSummary::new(2, "Dune: Part Two"))
            .await
            .unwrap();

        assert_eq!(record.count, 2);
        assert_eq!(record.movie_id, 1);
        assert_eq!(recorder.len(), 1);
    }

    #[tokio::test]
    async fn test_query_text_is_the_key() {
        let recorder = MemoryRecorder::new();
        let movie = MovieSummary::new(1, "Dune");
        recorder.record("dune", &movie).await.unwrap();
        recorder.record("Dune", &movie).await.unwrap();

        assert_eq!(recorder.len(), 2);
    }

    #[tokio::test]
    async fn test_top_orders_by_count() {
        let recorder = MemoryRecorder::new();
        let movie = MovieSummary::new(1, "Any");
        for query in ["alien", "batman", "batman", "casablanca", "batman", "alien"] {
            recorder.record(query, &movie).await.unwrap();
        }

        let top = recorder.top(2).await.unwrap();
        let queries: Vec<_> = top.iter().map(|r| (r.query.as_str(), r.count)).collect();
        assert_eq!(queries, vec![("batman", 3), ("alien", 2)]);
    }
}
