//! Test utilities and common setup.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use serde_json::json;
use tower::ServiceExt;

use quizdesk::api::{self, AppState, TableState};
use quizdesk::queue::{EventPublisher, PublishError, PublishResult};
use quizdesk::session::{DraftStore, SessionService, SessionServiceConfig};
use quizdesk::sessions::{ListQuery, SessionApi, SessionApiError, SessionApiResult};
use quizdesk_protocol::{MetaData, RepeatSchedule, Session, SessionEvent};

/// In-memory session API.
#[derive(Default)]
pub struct FakeSessionApi {
    pub sessions: Mutex<Vec<Session>>,
    pub queries: Mutex<Vec<ListQuery>>,
    pub created: Mutex<Vec<Session>>,
    pub fail: AtomicBool,
}

impl FakeSessionApi {
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> SessionApiResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(SessionApiError::ApiError {
                status: 500,
                message: "upstream down".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionApi for FakeSessionApi {
    async fn list(&self, query: &ListQuery) -> SessionApiResult<Vec<Session>> {
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .filter(|s| query.is_active.is_none() || s.is_active == query.is_active)
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> SessionApiResult<Session> {
        self.check()?;
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == Some(id))
            .cloned()
            .ok_or_else(|| SessionApiError::NotFound(id.to_string()))
    }

    async fn create(&self, session: &Session) -> SessionApiResult<Session> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        let id = sessions.iter().filter_map(|s| s.id).max().unwrap_or(0) + 1;
        let mut stored = session.clone();
        stored.id = Some(id);
        self.created.lock().unwrap().push(session.clone());
        sessions.push(stored.clone());
        Ok(stored)
    }
}

/// Publisher that keeps every event.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<SessionEvent>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &SessionEvent) -> PublishResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Rejected {
                status: 503,
                message: "queue unavailable".to_string(),
            });
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

impl RecordingPublisher {
    /// Wait for detached publishes to land.
    pub async fn wait_for(&self, count: usize) -> Vec<SessionEvent> {
        for _ in 0..100 {
            {
                let events = self.events.lock().unwrap();
                if events.len() >= count {
                    return events.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.events.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub api: Arc<FakeSessionApi>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .method(Method::GET)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, pairs: &[(&str, &str)]) -> Response<Body> {
        let body = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Request::builder()
                .uri(uri)
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .method(method)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub fn test_app_with(sessions: Vec<Session>) -> TestApp {
    let api = Arc::new(FakeSessionApi::with_sessions(sessions));
    let publisher = Arc::new(RecordingPublisher::default());
    let service = SessionService::new(
        api.clone(),
        publisher.clone(),
        SessionServiceConfig::default(),
    );
    let state = AppState::new(
        service,
        DraftStore::new(Duration::from_secs(600)),
        TableState::default(),
    )
    .unwrap();
    TestApp {
        router: api::create_router(state),
        api,
        publisher,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(vec![stored_session(9)])
}

/// A fully populated stored quiz session.
pub fn stored_session(id: i64) -> Session {
    Session {
        id: Some(id),
        name: Some(format!("Weekly Physics {id}")),
        platform: Some("quiz".to_string()),
        platform_link: Some(format!("https://quiz.example/s/{id}")),
        portal_link: Some(format!("https://portal.example/{id}")),
        session_id: Some(format!("EnableStudents_{id}")),
        session_type: Some("quiz".to_string()),
        auth_type: Some("ID".to_string()),
        signup_form: Some(true),
        popup_form: Some(false),
        id_generation: Some(false),
        redirection: Some(true),
        is_active: Some(true),
        start_time: Some("2024-05-01T10:00:00".to_string()),
        end_time: Some("2024-05-01T12:30:00".to_string()),
        repeat_schedule: Some(RepeatSchedule::weekly(vec![1, 3])),
        meta_data: Some(MetaData {
            group: Some("EnableStudents".to_string()),
            batch: Some("EN-11-Photon-Eng-24".to_string()),
            grade: Some(11),
            number_of_fields_in_popup_form: Some(json!("")),
            test_type: Some("assessment".to_string()),
            cms_test_id: Some("https://cms.example/t/1".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
