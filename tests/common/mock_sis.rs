use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const TOKEN: &str = "test-token";

pub const TERM_ID: &str = "term-1";
pub const SCHOOL_YEAR: &str = "2025-2026";
pub const TERM_NAME: &str = "Term 1";

#[derive(Default)]
pub struct MockState {
    /// Keyed by resource path segment, e.g. "tracks" or "faculty-assignments".
    pub collections: HashMap<&'static str, Vec<Value>>,
    pub users: Vec<Value>,
    pub registrants: Vec<Value>,
    pub audits: Vec<Value>,
    /// Names whose create call fails with a 500.
    pub reject: HashSet<String>,
    next_id: usize,
}

impl MockState {
    pub fn collection(&self, resource: &str) -> &[Value] {
        self.collections.get(resource).map_or(&[], Vec::as_slice)
    }
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the school information system, served by axum on
/// its own thread. Lives until the test process exits.
pub struct MockSis {
    pub base_url: String,
    state: Shared,
}

/// Fields that make a record a duplicate of an existing one.
const RESOURCES: &[(&str, &[&str])] = &[
    ("tracks", &["trackName"]),
    ("strands", &["strandName"]),
    ("sections", &["strandName", "sectionName", "gradeLevel"]),
    ("subjects", &["subjectName"]),
    ("faculty-assignments", &["subjectName", "sectionName"]),
    ("student-assignments", &["studentSchoolID", "sectionName"]),
];

impl MockSis {
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.set_nonblocking(true).expect("nonblocking");
        let port = listener.local_addr().expect("local addr").port();

        let app = router(state.clone());
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("listener");
                axum::serve(listener, app).await.expect("serve");
            });
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    pub fn reject(&self, name: &str) {
        self.state().reject.insert(name.to_string());
    }

    pub fn insert(&self, resource: &'static str, mut item: Value) {
        let mut state = self.state();
        state.next_id += 1;
        item["_id"] = json!(format!("seed-{}", state.next_id));
        state.collections.entry(resource).or_default().push(item);
    }

    pub fn add_user(&self, school_id: &str, role: &str, first: &str, last: &str) {
        let mut state = self.state();
        let id = format!("user-{school_id}");
        state.users.push(json!({
            "_id": id,
            "schoolID": school_id,
            "firstname": first,
            "lastname": last,
            "role": role,
            "status": "active",
        }));
    }

    pub fn approve(&self, school_id: &str) {
        self.state().registrants.push(json!({
            "schoolID": school_id,
            "status": "approved",
            "termName": TERM_NAME,
            "schoolYear": SCHOOL_YEAR,
        }));
    }

    /// Academic / STEM / Newton (Grade 11), General Mathematics, faculty F001 and student 25-00017.
    pub fn seed(&self) {
        let term = json!({ "schoolYear": SCHOOL_YEAR, "termName": TERM_NAME, "status": "active" });
        let with = |extra: Value| {
            let mut item = term.clone();
            for (k, v) in extra.as_object().expect("object") {
                item[k] = v.clone();
            }
            item
        };
        self.insert("tracks", with(json!({ "trackName": "Academic" })));
        self.insert(
            "strands",
            with(json!({ "trackName": "Academic", "strandName": "STEM" })),
        );
        self.insert(
            "sections",
            with(json!({
                "trackName": "Academic",
                "strandName": "STEM",
                "sectionName": "Newton",
                "sectionCode": "STEM-11A",
                "gradeLevel": "Grade 11",
            })),
        );
        self.insert(
            "subjects",
            with(json!({
                "trackName": "Academic",
                "strandName": "STEM",
                "gradeLevel": "Grade 11",
                "subjectName": "General Mathematics",
            })),
        );
        self.add_user("F001", "faculty", "Maria", "Santos");
        self.add_user("25-00017", "student", "Ana", "Reyes");
    }

    pub fn count(&self, resource: &str) -> usize {
        self.state().collection(resource).len()
    }
}

fn router(state: Shared) -> Router {
    let mut router: Router<Shared> = Router::new();

    for &(resource, keys) in RESOURCES {
        let list = get(move |State(state): State<Shared>| async move {
            let state = state.lock().expect("mock state poisoned");
            Json(state.collection(resource).to_vec())
        });
        let create_handler = move |State(state): State<Shared>, Json(body): Json<Value>| async move {
            create(&state, resource, keys, body)
        };
        let base = format!("/api/{resource}");
        router = if resource.ends_with("assignments") {
            router.route(&base, list.post(create_handler))
        } else {
            router
                .route(&format!("{base}/termId/{{term_id}}"), list)
                .route(&base, post(create_handler))
        };
    }

    router
        .route("/api/registrants", get(list_registrants))
        .route("/users/active", get(list_active_users))
        .route("/users/search", get(search_users))
        .route("/audit-log", post(record_audit))
        .layer(middleware::from_fn(require_token))
        .with_state(state)
}

async fn require_token(req: Request, next: Next) -> Response {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid or missing token" })),
        )
            .into_response();
    }
    next.run(req).await
}

fn same(a: &Value, b: &Value) -> bool {
    match (a.as_str(), b.as_str()) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => a == b,
    }
}

fn create(state: &Shared, resource: &'static str, keys: &[&str], mut body: Value) -> Response {
    let mut state = state.lock().expect("mock state poisoned");

    let rejected = keys
        .iter()
        .filter_map(|k| body[*k].as_str())
        .any(|v| state.reject.contains(v));
    if rejected {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Database unavailable" })),
        )
            .into_response();
    }

    let duplicate = state
        .collection(resource)
        .iter()
        .any(|item| keys.iter().all(|k| same(&item[*k], &body[*k])));
    if duplicate {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": format!("Record already exists in {resource}") })),
        )
            .into_response();
    }

    state.next_id += 1;
    body["_id"] = json!(format!("{resource}-{}", state.next_id));
    body["status"] = json!("active");
    state.collections.entry(resource).or_default().push(body.clone());

    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_registrants(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let limit = query
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(usize::MAX);
    let state = state.lock().expect("mock state poisoned");
    Json(state.registrants.iter().take(limit).cloned().collect())
}

async fn list_active_users(State(state): State<Shared>) -> Json<Vec<Value>> {
    let state = state.lock().expect("mock state poisoned");
    Json(
        state
            .users
            .iter()
            .filter(|u| u["status"] == "active")
            .cloned()
            .collect(),
    )
}

async fn search_users(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let q = query.get("q").cloned().unwrap_or_default().to_lowercase();
    let state = state.lock().expect("mock state poisoned");
    Json(
        state
            .users
            .iter()
            .filter(|u| {
                ["schoolID", "firstname", "lastname"].iter().any(|k| {
                    u[*k]
                        .as_str()
                        .is_some_and(|v| v.to_lowercase().contains(&q))
                })
            })
            .cloned()
            .collect(),
    )
}

async fn record_audit(State(state): State<Shared>, Json(entry): Json<Value>) -> StatusCode {
    state.lock().expect("mock state poisoned").audits.push(entry);
    StatusCode::CREATED
}
