//! Remote session store client.
//!
//! `GET {base}/players/{id}/progress` returns the stored cursor (404 for a
//! new player). `POST {base}/players/{id}/commits` takes a commit record and
//! answers `{"sequence": n}`.

use std::time::Duration;

use async_trait::async_trait;
use casebook_core::error::DomainError;
use casebook_core::progress::Progress;
use casebook_core::store::{CommitRecord, ProgressStore};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Upper bound on one request, independent of the caller's retry policy.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sequence: u64,
}

/// HTTP client for the remote session store.
#[derive(Debug, Clone)]
pub struct HttpProgressStore {
    client: Client,
    base_url: String,
}

impl HttpProgressStore {
    /// Creates a client for the store at `base_url` whose requests give up
    /// after [`REQUEST_TIMEOUT`].
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });
        Self::with_client(client, base_url)
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn player_url(&self, player_id: Uuid, tail: &str) -> String {
        format!("{}/players/{player_id}/{tail}", self.base_url)
    }
}

fn transport(e: &reqwest::Error) -> DomainError {
    DomainError::Persistence(format!("session store request failed: {e}"))
}

#[async_trait]
impl ProgressStore for HttpProgressStore {
    async fn load(&self, player_id: Uuid) -> Result<Option<Progress>, DomainError> {
        let url = self.player_url(player_id, "progress");
        debug!(%url, "loading progress");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json().await.map(Some).map_err(|e| transport(&e))
            }
            status => Err(DomainError::Persistence(format!(
                "session store answered {status} for {url}"
            ))),
        }
    }

    async fn commit(&self, record: &CommitRecord) -> Result<u64, DomainError> {
        let url = self.player_url(record.player_id, "commits");
        debug!(%url, correlation_id = %record.correlation_id, "sending commit");
        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        if !response.status().is_success() {
            return Err(DomainError::Persistence(format!(
                "session store answered {} for {url}",
                response.status()
            )));
        }
        let body: CommitResponse = response.json().await.map_err(|e| transport(&e))?;
        Ok(body.sequence)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use casebook_core::progress::{SceneCursor, ScenePosition};
    use chrono::{TimeZone, Utc};

    use super::*;

    type Db = Arc<Mutex<HashMap<Uuid, Progress>>>;

    async fn get_progress(
        State(db): State<Db>,
        Path(player_id): Path<Uuid>,
    ) -> Result<Json<Progress>, AxumStatus> {
        db.lock()
            .unwrap()
            .get(&player_id)
            .copied()
            .map(Json)
            .ok_or(AxumStatus::NOT_FOUND)
    }

    async fn post_commit(
        State(db): State<Db>,
        Path(player_id): Path<Uuid>,
        Json(record): Json<CommitRecord>,
    ) -> Json<serde_json::Value> {
        let mut db = db.lock().unwrap();
        db.insert(player_id, record.progress);
        Json(serde_json::json!({ "sequence": db.len() }))
    }

    async fn spawn_store() -> (String, Db) {
        let db: Db = Arc::new(Mutex::new(HashMap::new()));
        let app = Router::new()
            .route("/players/{player_id}/progress", get(get_progress))
            .route("/players/{player_id}/commits", post(post_commit))
            .with_state(db.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), db)
    }

    #[tokio::test]
    async fn test_load_unknown_player_returns_none() {
        let (base, _db) = spawn_store().await;
        let store = HttpProgressStore::new(base);

        let loaded = store.load(Uuid::new_v4()).await.unwrap();

        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_commit_then_load_round_trips_failed_marker() {
        // Arrange
        let (base, db) = spawn_store().await;
        let store = HttpProgressStore::new(base);
        let player_id = Uuid::new_v4();
        let progress = Progress {
            session: 1,
            level: 0,
            scene: SceneCursor::failed(2),
        };
        let record = CommitRecord {
            player_id,
            correlation_id: Uuid::new_v4(),
            progress,
            summaries: vec![serde_json::json!({"kind": "choice", "picked": 1})],
            committed_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        };

        // Act
        let sequence = store.commit(&record).await.unwrap();
        let loaded = store.load(player_id).await.unwrap();

        // Assert
        assert_eq!(sequence, 1);
        assert_eq!(loaded, Some(progress));
        assert_eq!(
            db.lock().unwrap()[&player_id].position(),
            ScenePosition::new(1, 0, 2)
        );
    }

    #[tokio::test]
    async fn test_unreachable_store_is_a_persistence_error() {
        let store = HttpProgressStore::new("http://127.0.0.1:9");

        let result = store.load(Uuid::new_v4()).await;

        assert!(matches!(result, Err(DomainError::Persistence(_))));
    }
}
