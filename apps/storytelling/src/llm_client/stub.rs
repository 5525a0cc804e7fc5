//! Local stand-in for the Vertex AI REST API, for tests.

use std::sync::{Arc, Mutex};

use axum::{
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};

use crate::config::ProviderSettings;

/// One request as the stub received it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct StubVertex {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubVertex {
    /// Serves `body` with `status` for every request on an ephemeral port.
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let seen: Arc<Mutex<Vec<SeenRequest>>> = Arc::default();
        let recorder = Arc::clone(&seen);

        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, request_body: String| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().unwrap().push(SeenRequest {
                        method,
                        path: uri.path().to_string(),
                        authorization: headers
                            .get(header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body: request_body,
                    });
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            },
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
        }
    }

    /// Settings that route every call to this stub.
    pub fn settings(&self, project: &str, location: &str, model: &str) -> ProviderSettings {
        ProviderSettings {
            project: Some(project.to_string()),
            location: location.to_string(),
            model: model.to_string(),
            access_token: Some("test-token".to_string()),
            endpoint: Some(self.base_url.clone()),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}
