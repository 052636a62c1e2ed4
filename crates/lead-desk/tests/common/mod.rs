#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use serde_json::{json, Value};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server runs");
    });
    format!("http://{addr}")
}

/// Captured request details for assertions.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub select: Option<String>,
    pub order: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    pub fn push(&self, captured: Captured) {
        self.inner.lock().expect("recorder mutex poisoned").push(captured);
    }

    pub fn all(&self) -> Vec<Captured> {
        self.inner.lock().expect("recorder mutex poisoned").clone()
    }
}

pub fn lead_rows() -> Value {
    json!([
        {
            "id": "6a1f",
            "name": "Priya Raman",
            "email": "priya@northwind.test",
            "company": "Northwind Freight",
            "website": "https://northwind.test",
            "problem_text": "Dispatch is run from spreadsheets",
            "status": "new",
            "score": 81,
            "fit_band": "Enterprise",
            "label": "ops-automation",
            "industry": "Logistics",
            "use_case_label": "Dispatch",
            "company_size": "201-500",
            "fit_score": 0.92,
            "created_at": "2025-03-04T10:00:00Z",
            "updated_at": "2025-03-04T10:00:00Z"
        },
        {
            "id": "52c0",
            "name": "Tom Okafor",
            "email": "tom@brightpath.test",
            "company": null,
            "website": null,
            "problem_text": "Need a chatbot for support",
            "status": "Nurturing",
            "score": null,
            "fit_band": "SMB",
            "label": "support",
            "created_at": "2025-03-03T08:30:00Z",
            "updated_at": "2025-03-03T08:30:00Z"
        },
        {
            "id": "19bd",
            "name": "Mei Lin",
            "email": "mei@keystone.test",
            "problem_text": "Invoice matching",
            "status": "contacted",
            "fit_band": "  ",
            "label": "ops-automation",
            "created_at": "2025-03-01T12:00:00Z",
            "updated_at": "2025-03-02T09:15:00Z"
        }
    ])
}
