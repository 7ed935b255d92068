use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use super::*;
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the school information system's REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    user_role: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(server_url: &str, token: &str, user_role: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            user_role: user_role.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn user_role(&self) -> &str {
        &self.user_role
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).bearer_auth(&self.token).send()?;
        self.handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()?;
        self.handle_response(resp)
    }

    fn handle_response<T: DeserializeOwned>(&self, resp: Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json()?);
        }

        let text = resp.text().unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .or(body.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Server error (no details provided)")
                    .to_string()
            });
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn term_path(resource: &str, scope: &TermScope) -> String {
    format!(
        "/api/{resource}/termId/{}",
        urlencoding::encode(&scope.term_id)
    )
}

impl SisApi for ApiClient {
    fn list_tracks(&self, scope: &TermScope) -> Result<Vec<Track>> {
        self.get(&term_path("tracks", scope))
    }

    fn list_strands(&self, scope: &TermScope) -> Result<Vec<Strand>> {
        self.get(&term_path("strands", scope))
    }

    fn list_sections(&self, scope: &TermScope) -> Result<Vec<Section>> {
        self.get(&term_path("sections", scope))
    }

    fn list_subjects(&self, scope: &TermScope) -> Result<Vec<Subject>> {
        self.get(&term_path("subjects", scope))
    }

    fn create_track(&self, req: &NewTrack) -> Result<Track> {
        self.post("/api/tracks", req)
    }

    fn create_strand(&self, req: &NewStrand) -> Result<Strand> {
        self.post("/api/strands", req)
    }

    fn create_section(&self, req: &NewSection) -> Result<Section> {
        self.post("/api/sections", req)
    }

    fn create_subject(&self, req: &NewSubject) -> Result<Subject> {
        self.post("/api/subjects", req)
    }

    fn list_faculty_assignments(&self, scope: &TermScope) -> Result<Vec<FacultyAssignment>> {
        self.get(&format!(
            "/api/faculty-assignments?termId={}",
            urlencoding::encode(&scope.term_id)
        ))
    }

    fn list_student_assignments(&self, scope: &TermScope) -> Result<Vec<StudentAssignment>> {
        let mut path = format!(
            "/api/student-assignments?termId={}",
            urlencoding::encode(&scope.term_id)
        );
        if let Some(quarter) = &scope.quarter_name {
            path.push_str(&format!("&quarterName={}", urlencoding::encode(quarter)));
        }
        self.get(&path)
    }

    fn create_faculty_assignment(&self, req: &NewFacultyAssignment) -> Result<FacultyAssignment> {
        self.post("/api/faculty-assignments", req)
    }

    fn create_student_assignment(&self, req: &NewStudentAssignment) -> Result<StudentAssignment> {
        self.post("/api/student-assignments", req)
    }

    fn list_active_users(&self) -> Result<Vec<UserAccount>> {
        self.get("/users/active")
    }

    fn search_users(&self, query: &str) -> Result<Vec<UserAccount>> {
        self.get(&format!("/users/search?q={}", urlencoding::encode(query)))
    }

    fn list_registrants(&self, limit: u32) -> Result<Vec<Registrant>> {
        self.get(&format!("/api/registrants?limit={limit}"))
    }

    fn record_audit(&self, action: &str, details: &str) {
        let url = format!("{}/audit-log", self.base_url);
        let entry = AuditEntry {
            action: action.to_string(),
            details: details.to_string(),
            user_role: self.user_role.clone(),
        };
        match self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&entry)
            .send()
        {
            Ok(resp) if !resp.status().is_success() => {
                debug!("audit log rejected '{}': {}", entry.action, resp.status());
            }
            Ok(_) => {}
            Err(e) => debug!("audit log failed for '{}': {e}", entry.action),
        }
    }
}
