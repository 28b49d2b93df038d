//! End-to-end integration tests for the REST API.
//!
//! Each test boots a real server on a random port against a fresh temp
//! database file, then drives the API over HTTP: auth flow, CRUD verticals,
//! the case-session cascade, payment reconciliation, and slot suggestion.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use lexfirm::config::{AuthConfig, DatabaseConfig, ServerConfig};
use lexfirm::db;
use lexfirm::web::auth::AuthState;
use lexfirm::web::server::{AppState, start_server};

const JWT_SECRET: &str = "integration-test-secret-0123456789";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    // Held so the database file outlives the server.
    _tmp: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let tmp = tempfile::tempdir().expect("temp dir");
        let db_path = tmp.path().join("lexfirm-test.db");
        let database = db::connect_from_config(&DatabaseConfig {
            path: db_path.to_string_lossy().into_owned(),
        })
        .await
        .expect("database");

        let auth = AuthState::new(&AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_hours: 1,
        });
        let state = Arc::new(AppState::new(database, auth));

        let config = ServerConfig {
            bind: "127.0.0.1:0".parse::<SocketAddr>().expect("bind addr"),
            cors_origins: Vec::new(),
        };
        let addr = start_server(&config, state).await.expect("server start");

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _tmp: tmp,
        }
    }

    async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (u16, Value) {
        let mut req = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.expect("request");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn patch(&self, path: &str, token: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .patch(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("request");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn get(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        let mut req = self.client.get(format!("{}{path}", self.base_url));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.expect("request");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn delete(&self, path: &str, token: &str) -> (u16, Value) {
        let resp = self
            .client
            .delete(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .expect("request");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    /// Register a lawyer and log in; returns (token, user id).
    async fn login_lawyer(&self, email: &str) -> (String, String) {
        let (status, _) = self
            .post(
                "/api/auth/register-lawyer",
                None,
                json!({
                    "email": email,
                    "full_name": "Test Lawyer",
                    "password": "StrongPass123"
                }),
            )
            .await;
        assert_eq!(status, 201);

        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": "StrongPass123" }),
            )
            .await;
        assert_eq!(status, 200);
        (
            body["access_token"].as_str().expect("token").to_string(),
            body["user"]["id"].as_str().expect("user id").to_string(),
        )
    }

    async fn create_client_record(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/clients",
                Some(token),
                json!({ "name": name, "client_type": "COMPANY" }),
            )
            .await;
        assert_eq!(status, 201);
        body["id"].as_str().expect("client id").to_string()
    }

    async fn create_case_record(&self, token: &str, client_id: &str, number: &str) -> String {
        let (status, body) = self
            .post(
                "/api/cases",
                Some(token),
                json!({
                    "case_number": number,
                    "case_type": "COMMERCIAL",
                    "client_id": client_id
                }),
            )
            .await;
        assert_eq!(status, 201);
        body["id"].as_str().expect("case id").to_string()
    }
}

fn parse_ts(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().expect("timestamp string"))
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

#[tokio::test]
async fn health_is_public_and_everything_else_needs_a_token() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/api/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = server.get("/api/clients", None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = server.get("/api/clients", Some("not-a-real-token")).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn registration_rejects_duplicates_and_bad_input() {
    let server = TestServer::start().await;

    let (status, body) = server
        .post(
            "/api/auth/register-lawyer",
            None,
            json!({ "email": "not-an-email", "full_name": "", "password": "abc" }),
        )
        .await;
    assert_eq!(status, 400);
    let messages = body["message"].as_array().expect("message list");
    assert_eq!(messages.len(), 3);

    let (token, _) = server.login_lawyer("first@firm.example").await;
    assert!(!token.is_empty());

    // Same email again: first one wins, second gets a conflict.
    let (status, body) = server
        .post(
            "/api/auth/register-lawyer",
            None,
            json!({
                "email": "first@firm.example",
                "full_name": "Second Lawyer",
                "password": "OtherPass123"
            }),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["message"][0], "Email is already registered");

    let (status, _) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "first@firm.example", "password": "WrongPass123" }),
        )
        .await;
    assert_eq!(status, 401);

    let (status, body) = server.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["email"], "first@firm.example");
    assert_eq!(body["user"]["role"], "LAWYER");
}

#[tokio::test]
async fn deleting_a_case_cascades_sessions_but_clients_keep_their_cases() {
    let server = TestServer::start().await;
    let (token, _) = server.login_lawyer("cascade@firm.example").await;

    let client_id = server.create_client_record(&token, "Acme Trading").await;
    let case_id = server.create_case_record(&token, &client_id, "1447/101").await;

    for day in ["2027-03-01", "2027-04-01"] {
        let (status, _) = server
            .post(
                &format!("/api/cases/{case_id}/sessions"),
                Some(&token),
                json!({ "date": day, "location": "Riyadh Commercial Court" }),
            )
            .await;
        assert_eq!(status, 201);
    }
    let (status, body) = server
        .get(&format!("/api/cases/{case_id}/sessions"), Some(&token))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);

    // Case creation against a missing client is refused.
    let (status, _) = server
        .post(
            "/api/cases",
            Some(&token),
            json!({
                "case_number": "1447/999",
                "client_id": "00000000-0000-0000-0000-000000000000"
            }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, body) = server.delete(&format!("/api/cases/{case_id}"), &token).await;
    assert_eq!(status, 200);
    assert_eq!(body["deleted"], true);
    let (status, _) = server
        .get(&format!("/api/cases/{case_id}/sessions"), Some(&token))
        .await;
    assert_eq!(status, 404);

    // Deleting a client leaves its remaining cases in place.
    let survivor_id = server.create_case_record(&token, &client_id, "1447/102").await;
    let (status, _) = server.delete(&format!("/api/clients/{client_id}"), &token).await;
    assert_eq!(status, 200);
    let (status, body) = server.get(&format!("/api/cases/{survivor_id}"), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["case_number"], "1447/102");
}

#[tokio::test]
async fn payment_reconciliation_tracks_partial_overdue_and_paid() {
    let server = TestServer::start().await;
    let (token, _) = server.login_lawyer("billing@firm.example").await;
    let client_id = server.create_client_record(&token, "Delta Holdings").await;

    // Invoice already past due when the first payment lands.
    let (status, body) = server
        .post(
            "/api/billing/invoices",
            Some(&token),
            json!({
                "client_id": client_id,
                "billing_model": "FIXED",
                "total_amount": "1000",
                "currency": "SAR",
                "status": "SENT",
                "due_date": "2020-01-01"
            }),
        )
        .await;
    assert_eq!(status, 201);
    let overdue_invoice = body["id"].as_str().unwrap().to_string();

    let (status, _) = server
        .post(
            &format!("/api/billing/invoices/{overdue_invoice}/payments"),
            Some(&token),
            json!({ "amount": "400", "currency": "SAR", "paid_at": "2026-08-01T10:00:00Z" }),
        )
        .await;
    assert_eq!(status, 201);
    let (_, body) = server
        .get(&format!("/api/billing/invoices/{overdue_invoice}"), Some(&token))
        .await;
    assert_eq!(body["status"], "OVERDUE");

    // Paying the rest flips it to PAID and stamps the payment's paid_at.
    let (status, _) = server
        .post(
            &format!("/api/billing/invoices/{overdue_invoice}/payments"),
            Some(&token),
            json!({ "amount": "600", "currency": "SAR", "paid_at": "2026-08-02T09:30:00Z" }),
        )
        .await;
    assert_eq!(status, 201);
    let (_, body) = server
        .get(&format!("/api/billing/invoices/{overdue_invoice}"), Some(&token))
        .await;
    assert_eq!(body["status"], "PAID");
    assert_eq!(
        parse_ts(&body["paid_at"]),
        Utc.with_ymd_and_hms(2026, 8, 2, 9, 30, 0).unwrap()
    );

    // A partial payment against a not-yet-due invoice stays PARTIALLY_PAID.
    let future_due = (Utc::now() + Duration::days(30)).to_rfc3339();
    let (_, body) = server
        .post(
            "/api/billing/invoices",
            Some(&token),
            json!({
                "client_id": client_id,
                "billing_model": "HOURLY",
                "total_amount": "500",
                "currency": "SAR",
                "status": "SENT",
                "due_date": future_due
            }),
        )
        .await;
    let open_invoice = body["id"].as_str().unwrap().to_string();
    let (status, _) = server
        .post(
            &format!("/api/billing/invoices/{open_invoice}/payments"),
            Some(&token),
            json!({ "amount": "100", "currency": "SAR", "paid_at": "2026-08-03T12:00:00Z" }),
        )
        .await;
    assert_eq!(status, 201);
    let (_, body) = server
        .get(&format!("/api/billing/invoices/{open_invoice}"), Some(&token))
        .await;
    assert_eq!(body["status"], "PARTIALLY_PAID");
    assert!(body["paid_at"].is_null());

    // Non-positive amounts are refused.
    let (status, _) = server
        .post(
            &format!("/api/billing/invoices/{open_invoice}/payments"),
            Some(&token),
            json!({ "amount": "-5", "currency": "SAR", "paid_at": "2026-08-03T12:00:00Z" }),
        )
        .await;
    assert_eq!(status, 400);

    // Summary: 1500 invoiced, 1100 paid, 400 outstanding, none overdue
    // (the overdue invoice is fully paid).
    let (status, body) = server.get("/api/billing/summary", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["total_invoiced"], "1500");
    assert_eq!(body["total_paid"], "1100");
    assert_eq!(body["outstanding"], "400");
    assert_eq!(body["overdue"], "0");
}

#[tokio::test]
async fn slot_suggestion_walks_around_existing_bookings() {
    let server = TestServer::start().await;
    let (token, lawyer_id) = server.login_lawyer("calendar@firm.example").await;

    let (status, _) = server
        .post(
            "/api/calendar",
            Some(&token),
            json!({
                "title": "Hearing",
                "event_type": "SESSION",
                "start_at": "2026-09-15T10:00:00Z",
                "end_at": "2026-09-15T11:00:00Z",
                "assigned_to_id": lawyer_id
            }),
        )
        .await;
    assert_eq!(status, 201);

    let (status, body) = server
        .get(
            &format!("/api/calendar/suggest/slots?date=2026-09-15&assigned_to_id={lawyer_id}"),
            Some(&token),
        )
        .await;
    assert_eq!(status, 200);
    let slots = body["slots"].as_array().expect("slots");
    assert_eq!(slots.len(), 2);

    // The hour before the booking fits exactly; the next slot opens at its end.
    let at = |h, m| Utc.with_ymd_and_hms(2026, 9, 15, h, m, 0).unwrap();
    assert_eq!(parse_ts(&slots[0]["start_at"]), at(9, 0));
    assert_eq!(parse_ts(&slots[0]["end_at"]), at(10, 0));
    assert_eq!(parse_ts(&slots[1]["start_at"]), at(11, 0));
    assert_eq!(parse_ts(&slots[1]["end_at"]), at(12, 0));

    // Another assignee's day is unaffected by this booking.
    let (_, other_lawyer) = server.login_lawyer("other@firm.example").await;
    let (status, body) = server
        .get(
            &format!("/api/calendar/suggest/slots?date=2026-09-15&assigned_to_id={other_lawyer}"),
            Some(&token),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["slots"].as_array().unwrap().len(), 1);

    let (status, _) = server
        .get("/api/calendar/suggest/slots?date=september", Some(&token))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn completing_a_task_stamps_completion_and_feeds_stats() {
    let server = TestServer::start().await;
    let (token, lawyer_id) = server.login_lawyer("tasks@firm.example").await;

    let overdue = (Utc::now() - Duration::days(2)).to_rfc3339();
    let (status, body) = server
        .post(
            "/api/tasks",
            Some(&token),
            json!({
                "title": "File appeal brief",
                "priority": "HIGH",
                "due_date": overdue,
                "assigned_to_id": lawyer_id,
                "created_by_id": lawyer_id
            }),
        )
        .await;
    assert_eq!(status, 201);
    let task_id = body["id"].as_str().unwrap().to_string();
    assert!(body["completed_at"].is_null());

    let (_, body) = server
        .post(
            "/api/tasks",
            Some(&token),
            json!({
                "title": "Draft settlement memo",
                "assigned_to_id": lawyer_id,
                "created_by_id": lawyer_id
            }),
        )
        .await;
    let done_task = body["id"].as_str().unwrap().to_string();

    let (status, body) = server
        .patch(&format!("/api/tasks/{done_task}"), &token, json!({ "status": "DONE" }))
        .await;
    assert_eq!(status, 200);
    assert!(!body["completed_at"].is_null());

    // Tasks with unknown assignees are refused.
    let (status, _) = server
        .post(
            "/api/tasks",
            Some(&token),
            json!({
                "title": "Orphan task",
                "assigned_to_id": "00000000-0000-0000-0000-000000000000",
                "created_by_id": lawyer_id
            }),
        )
        .await;
    assert_eq!(status, 404);

    let (status, body) = server.get("/api/tasks/stats/users", Some(&token)).await;
    assert_eq!(status, 200);
    let stats = body["stats"].as_array().expect("stats");
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["user_id"].as_str().unwrap(), lawyer_id);
    assert_eq!(stats[0]["open_tasks"], 1);
    assert_eq!(stats[0]["completed_tasks"], 1);
    assert_eq!(stats[0]["overdue_tasks"], 1);

    let (status, body) = server
        .get(&format!("/api/tasks?status=DONE&assigned_to_id={lawyer_id}"), Some(&token))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["tasks"][0]["id"].as_str().unwrap(), done_task);

    // The overdue task is untouched by the other task's completion.
    let (status, body) = server.get(&format!("/api/tasks/{task_id}"), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "TODO");
    assert!(body["completed_at"].is_null());
}

#[tokio::test]
async fn document_search_beats_id_filters() {
    let server = TestServer::start().await;
    let (token, _) = server.login_lawyer("documents@firm.example").await;

    for (title, text) in [
        ("Supply contract", "Master supply agreement with penalty clauses"),
        ("Power of attorney", "Authorization to represent the client in court"),
    ] {
        let (status, _) = server
            .post(
                "/api/documents",
                Some(&token),
                json!({
                    "title": title,
                    "doc_type": "CONTRACT",
                    "file_url": "https://files.firm.example/doc.pdf",
                    "text_content": text,
                    "tags": ["commercial"]
                }),
            )
            .await;
        assert_eq!(status, 201);
    }

    let (status, body) = server
        .get("/api/documents?search=penalty", Some(&token))
        .await;
    assert_eq!(status, 200);
    let documents = body["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["title"], "Supply contract");

    let (status, body) = server.get("/api/documents", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn notification_preview_and_simulated_send() {
    let server = TestServer::start().await;
    let (token, _) = server.login_lawyer("notify@firm.example").await;

    let client_id = server.create_client_record(&token, "Najm Logistics").await;
    let case_id = server.create_case_record(&token, &client_id, "1447/300").await;

    // One session inside the 24h preview window, one beyond it.
    let soon = (Utc::now() + Duration::hours(2)).to_rfc3339();
    let later = (Utc::now() + Duration::days(3)).to_rfc3339();
    for date in [&soon, &later] {
        let (status, _) = server
            .post(
                &format!("/api/cases/{case_id}/sessions"),
                Some(&token),
                json!({ "date": date }),
            )
            .await;
        assert_eq!(status, 201);
    }

    let (status, body) = server
        .get("/api/notifications/preview/case-sessions", Some(&token))
        .await;
    assert_eq!(status, 200);
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["case_number"], "1447/300");
    assert_eq!(sessions[0]["client_name"], "Najm Logistics");

    let (status, body) = server
        .post(
            "/api/notifications",
            Some(&token),
            json!({
                "channel": "EMAIL",
                "notification_type": "SESSION_REMINDER",
                "target_email": "client@najm.example",
                "case_id": case_id
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["status"], "PENDING");
    let notification_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = server
        .post(
            &format!("/api/notifications/{notification_id}/simulate-send"),
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "SENT");
    assert!(!body["sent_at"].is_null());

    let (status, _) = server
        .post(
            "/api/notifications/00000000-0000-0000-0000-000000000000/simulate-send",
            Some(&token),
            json!({}),
        )
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn reports_and_assistant_stubs_round_out_the_api() {
    let server = TestServer::start().await;
    let (token, lawyer_id) = server.login_lawyer("reports@firm.example").await;

    let client_id = server.create_client_record(&token, "Qamar Estates").await;
    let case_id = server.create_case_record(&token, &client_id, "1447/400").await;
    let (status, _) = server
        .post(
            "/api/billing/invoices",
            Some(&token),
            json!({
                "client_id": client_id,
                "case_id": case_id,
                "billing_model": "FIXED",
                "total_amount": "900",
                "currency": "SAR"
            }),
        )
        .await;
    assert_eq!(status, 201);
    let (status, _) = server
        .post(
            "/api/tasks",
            Some(&token),
            json!({
                "title": "Prepare hearing bundle",
                "assigned_to_id": lawyer_id,
                "created_by_id": lawyer_id
            }),
        )
        .await;
    assert_eq!(status, 201);

    let (status, body) = server.get("/api/reports/cases-overview", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 1);
    assert_eq!(body["by_type"]["COMMERCIAL"], 1);

    let (status, body) = server.get("/api/reports/top-case-types", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body[0]["case_type"], "COMMERCIAL");
    assert_eq!(body[0]["total"], "900");

    let (status, body) = server
        .get("/api/reports/client-profitability", Some(&token))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body[0]["client_name"], "Qamar Estates");
    assert_eq!(body[0]["outstanding"], "900");

    let (status, body) = server.get("/api/reports/dashboard", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["financial_overview"]["total_invoiced"], "900");
    assert_eq!(body["team_performance"].as_array().unwrap().len(), 1);

    // Assistant stubs: truncating summary and the fixed memo scaffold.
    let long_text = "lorem ".repeat(100);
    let (status, body) = server
        .post("/api/ai/summarize-text", Some(&token), json!({ "text": long_text }))
        .await;
    assert_eq!(status, 200);
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.ends_with("..."));
    assert_eq!(summary.chars().count(), 303);

    let (status, body) = server
        .post(
            "/api/ai/generate-case-memo",
            Some(&token),
            json!({ "case_summary": "Lease dispute over early termination" }),
        )
        .await;
    assert_eq!(status, 200);
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["body"], "Lease dispute over early termination");

    let (status, body) = server
        .post("/api/ai/analyze-client-sentiment", Some(&token), json!({ "interactions": [] }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["label"], "NEUTRAL");
}
