use crate::catalog::MovieSummary;
use crate::recorder::{RecorderError, Result, SearchCount, UsageRecorder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Document store location and credentials
#[derive(Clone, Deserialize, Default)]
pub struct AppwriteConfig {
    /// API root, e.g. `https://cloud.appwrite.io/v1`
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub database_id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

// Keep the key out of logs
impl std::fmt::Debug for AppwriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("collection_id", &self.collection_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AppwriteConfig {
    /// Names of required settings that are empty
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("endpoint", self.endpoint.as_str()),
            ("project_id", self.project_id.as_str()),
            ("database_id", self.database_id.as_str()),
            ("collection_id", self.collection_id.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: u64,
    movie_id: i64,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    #[serde(rename = "$updatedAt")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<Document> for SearchCount {
    fn from(doc: Document) -> Self {
        Self {
            query: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            title: doc.title,
            poster_path: doc.poster_path,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewSearchDocument<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: u64,
    movie_id: i64,
    title: &'a str,
    poster_path: Option<&'a str>,
}

/// Recorder backed by an Appwrite collection
pub struct AppwriteRecorder {
    client: Client,
    documents_url: String,
}

impl AppwriteRecorder {
    pub fn new(config: &AppwriteConfig) -> Result<Self> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(RecorderError::Config(format!(
                "missing appwrite settings: {}",
                missing.join(", ")
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-appwrite-project"),
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| RecorderError::Config(format!("invalid project id: {e}")))?,
        );
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(key)
                .map_err(|e| RecorderError::Config(format!("invalid api key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static("x-appwrite-key"), value);
        }

        let client = Client::builder()
            .user_agent(concat!("Marquee/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            documents_url: format!(
                "{}/databases/{}/collections/{}/documents",
                config.endpoint.trim_end_matches('/'),
                config.database_id,
                config.collection_id
            ),
        })
    }

    fn list_url(&self, queries: &[serde_json::Value]) -> String {
        let params: Vec<String> = queries
            .iter()
            .map(|q| format!("queries[]={}", urlencoding::encode(&q.to_string())))
            .collect();
        format!("{}?{}", self.documents_url, params.join("&"))
    }

    async fn find(&self, query: &str) -> Result<Option<Document>> {
        let url = self.list_url(&[
            json!({"method": "equal", "attribute": "searchTerm", "values": [query]}),
            json!({"method": "limit", "values": [1]}),
        ]);
        let list: DocumentList = Self::handle_response(self.client.get(&url).send().await?).await?;
        Ok(list.documents.into_iter().next())
    }

    async fn increment(&self, doc: &Document) -> Result<Document> {
        let url = format!("{}/{}", self.documents_url, doc.id);
        let body = json!({"data": {"count": doc.count + 1}});
        Self::handle_response(self.client.patch(&url).json(&body).send().await?).await
    }

    async fn create(&self, query: &str, movie: &MovieSummary) -> Result<Document> {
        let body = json!({
            "documentId": "unique()",
            "data": NewSearchDocument {
                search_term: query,
                count: 1,
                movie_id: movie.id,
                title: &movie.title,
                poster_path: movie.poster_path.as_deref(),
            },
        });
        Self::handle_response(
            self.client
                .post(&self.documents_url)
                .json(&body)
                .send()
                .await?,
        )
        .await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();

            return Err(RecorderError::Api {
                status: status_code,
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RecorderError::Parse(format!("JSON parse error: {e}")))
    }
}

#[async_trait]
impl UsageRecorder for AppwriteRecorder {
    fn id(&self) -> &'static str {
        "appwrite"
    }

    // Lookup then write is not atomic; two concurrent first searches can
    // both create a document.
    async fn record(&self, query: &str, movie: &MovieSummary) -> Result<SearchCount> {
        let doc = match self.find(query).await? {
            Some(existing) => {
                debug!("Incrementing search document {}", existing.id);
                self.increment(&existing).await?
            }
            None => {
                debug!("Creating search document for '{}'", query);
                self.create(query, movie).await?
            }
        };

        Ok(doc.into())
    }

    async fn top(&self, limit: usize) -> Result<Vec<SearchCount>> {
        let url = self.list_url(&[
            json!({"method": "orderDesc", "attribute": "count"}),
            json!({"method": "limit", "values": [limit]}),
        ]);
        let list: DocumentList = Self::handle_response(self.client.get(&url).send().await?).await?;

        Ok(list.documents.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, RawQuery, State},
        http::{HeaderMap as AxumHeaders, StatusCode},
        routing::{get, patch},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Store = Arc<Mutex<Vec<Value>>>;

    fn decoded_queries(raw: Option<String>) -> Vec<Value> {
        raw.unwrap_or_default()
            .split('&')
            .filter_map(|pair| pair.strip_prefix("queries[]="))
            .filter_map(|q| urlencoding::decode(q).ok())
            .filter_map(|q| serde_json::from_str(&q).ok())
            .collect()
    }

    async fn list(
        State(store): State<Store>,
        headers: AxumHeaders,
        RawQuery(raw): RawQuery,
    ) -> (StatusCode, Json<Value>) {
        if headers.get("x-appwrite-project").map(|v| v.as_bytes()) != Some(b"marquee") {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no project"})));
        }

        let queries = decoded_queries(raw);
        let mut docs = store.lock().await.clone();
        for q in &queries {
            match q["method"].as_str() {
                Some("equal") => {
                    let wanted = q["values"][0].clone();
                    docs.retain(|d| d["searchTerm"] == wanted);
                }
                Some("orderDesc") => {
                    docs.sort_by_key(|d| std::cmp::Reverse(d["count"].as_u64().unwrap_or(0)));
                }
                Some("limit") => {
                    let n = q["values"][0].as_u64().unwrap_or(25) as usize;
                    docs.truncate(n);
                }
                _ => {}
            }
        }

        (
            StatusCode::OK,
            Json(json!({"total": docs.len(), "documents": docs})),
        )
    }

    async fn create(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
        let mut docs = store.lock().await;
        let mut doc = body["data"].clone();
        doc["$id"] = json!(format!("doc{}", docs.len() + 1));
        docs.push(doc.clone());
        Json(doc)
    }

    async fn update(
        State(store): State<Store>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let mut docs = store.lock().await;
        let doc = docs.iter_mut().find(|d| d["$id"] == json!(id)).unwrap();
        doc["count"] = body["data"]["count"].clone();
        Json(doc.clone())
    }

    async fn recorder() -> (AppwriteRecorder, Store) {
        let store: Store = Arc::default();
        let base = "/databases/main/collections/searches/documents";
        let router = Router::new()
            .route(base, get(list).post(create))
            .route(&format!("{base}/{{id}}"), patch(update))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = AppwriteConfig {
            endpoint: format!("http://{addr}/"),
            project_id: "marquee".to_string(),
            database_id: "main".to_string(),
            collection_id: "searches".to_string(),
            api_key: Some("secret".to_string()),
        };
        (AppwriteRecorder::new(&config).unwrap(), store)
    }

    #[test]
    fn test_missing_settings_rejected() {
        let config = AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            ..Default::default()
        };
        let err = AppwriteRecorder::new(&config).err().unwrap();
        assert!(matches!(err, RecorderError::Config(ref m) if m.contains("project_id")));
    }

    #[tokio::test]
    async fn test_creates_then_increments() {
        let (recorder, store) = recorder().await;
        let movie = MovieSummary::new(438631, "Dune")
            .with_poster(Some("/dune.jpg".to_string()), "https://img/w500/dune.jpg");

        let first = recorder.record("dune", &movie).await.unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.poster_path.as_deref(), Some("/dune.jpg"));

        let second = recorder.record("dune", &movie).await.unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.movie_id, 438631);
        assert_eq!(store.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_top_queries() {
        let (recorder, _store) = recorder().await;
        let movie = MovieSummary::new(1, "Any");
        for query in ["alien", "batman", "batman"] {
            recorder.record(query, &movie).await.unwrap();
        }

        let top = recorder.top(1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].query, "batman");
        assert_eq!(top[0].count, 2);
    }
}
