// src/services/backend_client.rs
// DOCUMENTATION: Client for the hosted backend (auth + REST tables)
// PURPOSE: Handle communication with the backend's auth and table endpoints

use crate::errors::GalleryError;
use crate::models::{AuthSession, AuthUser};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Sort clause of a table query
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
    pub nulls_first: bool,
}

/// Filter/sort description of a table read or write
/// DOCUMENTATION: Rendered to PostgREST query parameters by `to_params`.
/// Filter values keep their JSON type so a string "5" and a number 5 stay
/// distinct for callers that need to probe both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub columns: Option<String>,
    pub filters: Vec<(String, Value)>,
    pub order: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.to_string(),
            ascending,
            nulls_first: false,
        });
        self
    }

    pub fn order_nulls_first(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.to_string(),
            ascending,
            nulls_first: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render as PostgREST query parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(columns) = &self.columns {
            params.push(("select".to_string(), columns.clone()));
        }

        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", filter_text(value))));
        }

        if !self.order.is_empty() {
            let clauses: Vec<String> = self
                .order
                .iter()
                .map(|o| {
                    let mut clause = format!(
                        "{}.{}",
                        o.column,
                        if o.ascending { "asc" } else { "desc" }
                    );
                    if o.nulls_first {
                        clause.push_str(".nullsfirst");
                    }
                    clause
                })
                .collect();
            params.push(("order".to_string(), clauses.join(",")));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Text form of a filter value as it appears in the query string
pub fn filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Relational table access
/// DOCUMENTATION: Rows travel as JSON; use `rows_into` to get typed records
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn select_rows(&self, table: &str, query: &TableQuery) -> Result<Vec<Value>, GalleryError>;

    async fn insert_row(&self, table: &str, row: Value) -> Result<(), GalleryError>;

    async fn update_rows(
        &self,
        table: &str,
        query: &TableQuery,
        patch: Value,
    ) -> Result<(), GalleryError>;

    async fn delete_rows(&self, table: &str, query: &TableQuery) -> Result<(), GalleryError>;
}

/// Deserialize JSON rows into typed records
pub fn rows_into<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, GalleryError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| {
                log::error!("Failed to parse backend row: {}", e);
                GalleryError::BackendError(format!("Parse error: {}", e))
            })
        })
        .collect()
}

/// Backend client
/// DOCUMENTATION: One client per request identity. Cloning is cheap; the
/// underlying reqwest client (and its connection pool) is shared.
#[derive(Clone)]
pub struct BackendClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the backend project
    base_url: String,
    /// Anon key, the default `apikey`
    anon_key: String,
    /// Service-role key, may be empty
    service_key: String,
    /// Key sent in the `apikey` header
    api_key: String,
    /// Token sent as `Authorization: Bearer`
    bearer: String,
}

impl BackendClient {
    /// Create a client acting as the anonymous role
    pub fn new(client: Client, base_url: String, anon_key: String, service_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: anon_key.clone(),
            bearer: anon_key.clone(),
            anon_key,
            service_key,
        }
    }

    /// Client acting with a signed-in user's session
    pub fn as_user(&self, access_token: &str) -> Self {
        Self {
            api_key: self.anon_key.clone(),
            bearer: access_token.to_string(),
            ..self.clone()
        }
    }

    /// Client acting with the service role, or anon when no service key is set
    pub fn as_service(&self) -> Self {
        if self.service_key.is_empty() {
            return Self {
                api_key: self.anon_key.clone(),
                bearer: self.anon_key.clone(),
                ..self.clone()
            };
        }
        Self {
            api_key: self.service_key.clone(),
            bearer: self.service_key.clone(),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach `apikey` and bearer headers
    pub(crate) fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    /// Turn a non-success response into a BackendError carrying the backend's message
    pub(crate) async fn check(response: Response, context: &str) -> Result<Response, GalleryError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = backend_message(status.as_u16(), &body);
        log::error!("Backend {} failed ({}): {}", context, status, message);

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GalleryError::RateLimitExceeded);
        }
        Err(GalleryError::BackendError(message))
    }

    pub(crate) fn request_failed(context: &str, e: reqwest::Error) -> GalleryError {
        log::error!("Backend {} request failed: {}", context, e);
        GalleryError::BackendError(format!("Request failed: {}", e))
    }

    // ---- auth ----

    /// Password sign-in
    /// DOCUMENTATION: POST /auth/v1/token?grant_type=password
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, GalleryError> {
        log::debug!("Password sign-in for {}", email);

        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| Self::request_failed("sign-in", e))?;

        let response = Self::check(response, "sign-in").await?;
        response
            .json::<AuthSession>()
            .await
            .map_err(|e| GalleryError::BackendError(format!("Parse error: {}", e)))
    }

    /// Create an account with email and password
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), GalleryError> {
        log::info!("Sign-up requested for {}", email);

        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| Self::request_failed("sign-up", e))?;

        Self::check(response, "sign-up").await?;
        Ok(())
    }

    /// Send a magic link that lands on `redirect_to`
    pub async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> Result<(), GalleryError> {
        log::info!("Magic link requested for {}", email);

        let response = self
            .client
            .post(self.auth_url("otp"))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "create_user": true }))
            .send()
            .await
            .map_err(|e| Self::request_failed("magic link", e))?;

        Self::check(response, "magic link").await?;
        Ok(())
    }

    /// Resolve the user behind an access token.
    /// A rejected token maps to `Unauthorized`.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, GalleryError> {
        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Self::request_failed("get user", e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            log::debug!("Access token rejected by backend ({})", status);
            return Err(GalleryError::Unauthorized);
        }

        let response = Self::check(response, "get user").await?;
        response
            .json::<AuthUser>()
            .await
            .map_err(|e| GalleryError::BackendError(format!("Parse error: {}", e)))
    }

    /// Revoke the session behind an access token
    pub async fn sign_out(&self, access_token: &str) -> Result<(), GalleryError> {
        let response = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Self::request_failed("sign-out", e))?;

        Self::check(response, "sign-out").await?;
        Ok(())
    }
}

#[async_trait]
impl TableApi for BackendClient {
    async fn select_rows(&self, table: &str, query: &TableQuery) -> Result<Vec<Value>, GalleryError> {
        log::debug!("Select from {}: {:?}", table, query.to_params());

        let response = self
            .authed(self.client.get(self.rest_url(table)))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| Self::request_failed("select", e))?;

        let response = Self::check(response, &format!("select from {}", table)).await?;
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| GalleryError::BackendError(format!("Parse error: {}", e)))
    }

    async fn insert_row(&self, table: &str, row: Value) -> Result<(), GalleryError> {
        log::debug!("Insert into {}", table);

        let response = self
            .authed(self.client.post(self.rest_url(table)))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(|e| Self::request_failed("insert", e))?;

        Self::check(response, &format!("insert into {}", table)).await?;
        Ok(())
    }

    async fn update_rows(
        &self,
        table: &str,
        query: &TableQuery,
        patch: Value,
    ) -> Result<(), GalleryError> {
        if query.filters.is_empty() {
            return Err(GalleryError::InvalidInput(format!(
                "refusing unfiltered update of {}",
                table
            )));
        }

        let response = self
            .authed(self.client.patch(self.rest_url(table)))
            .query(&query.to_params())
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await
            .map_err(|e| Self::request_failed("update", e))?;

        Self::check(response, &format!("update {}", table)).await?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, query: &TableQuery) -> Result<(), GalleryError> {
        if query.filters.is_empty() {
            return Err(GalleryError::InvalidInput(format!(
                "refusing unfiltered delete from {}",
                table
            )));
        }

        let response = self
            .authed(self.client.delete(self.rest_url(table)))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| Self::request_failed("delete", e))?;

        Self::check(response, &format!("delete from {}", table)).await?;
        Ok(())
    }
}

/// Extract the human readable message from a backend error body
/// DOCUMENTATION: Auth, REST and storage endpoints use different field names
pub fn backend_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["message", "msg", "error_description", "error"] {
            if let Some(text) = value.get(field).and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory tables used by service tests

    use super::*;
    use std::cmp::Ordering;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryTables {
        pub tables: Mutex<HashMap<String, Vec<Value>>>,
        /// Every select issued, as (table, filters)
        pub selects: Mutex<Vec<(String, Vec<(String, Value)>)>>,
        /// Tables whose every call fails
        pub failing: HashSet<String>,
        next_id: Mutex<i64>,
    }

    impl MemoryTables {
        pub fn with_rows(table: &str, rows: Vec<Value>) -> Self {
            let tables = Self::default();
            tables.seed(table, rows);
            tables
        }

        pub fn seed(&self, table: &str, rows: Vec<Value>) {
            let mut next_id = self.next_id.lock().unwrap();
            for row in &rows {
                if let Some(id) = row.get("id").and_then(Value::as_i64) {
                    *next_id = (*next_id).max(id);
                }
            }
            self.tables
                .lock()
                .unwrap()
                .entry(table.to_string())
                .or_default()
                .extend(rows);
        }

        pub fn rows(&self, table: &str) -> Vec<Value> {
            self.tables
                .lock()
                .unwrap()
                .get(table)
                .cloned()
                .unwrap_or_default()
        }

        fn fail_if_configured(&self, table: &str) -> Result<(), GalleryError> {
            if self.failing.contains(table) {
                return Err(GalleryError::BackendError(format!("{} unavailable", table)));
            }
            Ok(())
        }
    }

    fn matches(row: &Value, query: &TableQuery) -> bool {
        query
            .filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }

    fn compare(a: &Value, b: &Value, nulls_first: bool) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => if nulls_first { Ordering::Less } else { Ordering::Greater },
            (false, true) => if nulls_first { Ordering::Greater } else { Ordering::Less },
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => filter_text(a).cmp(&filter_text(b)),
            },
        }
    }

    #[async_trait]
    impl TableApi for MemoryTables {
        async fn select_rows(&self, table: &str, query: &TableQuery) -> Result<Vec<Value>, GalleryError> {
            self.selects
                .lock()
                .unwrap()
                .push((table.to_string(), query.filters.clone()));
            self.fail_if_configured(table)?;

            let mut rows: Vec<Value> = self
                .rows(table)
                .into_iter()
                .filter(|row| matches(row, query))
                .collect();

            rows.sort_by(|a, b| {
                for order in &query.order {
                    let left = a.get(&order.column).unwrap_or(&Value::Null);
                    let right = b.get(&order.column).unwrap_or(&Value::Null);
                    let mut ord = compare(left, right, order.nulls_first);
                    if !order.ascending && !(left.is_null() || right.is_null()) {
                        ord = ord.reverse();
                    }
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });

            if let Some(limit) = query.limit {
                rows.truncate(limit);
            }

            if let Some(columns) = &query.columns {
                let wanted: Vec<&str> = columns.split(',').map(str::trim).collect();
                rows = rows
                    .into_iter()
                    .map(|row| {
                        let projected: serde_json::Map<String, Value> = wanted
                            .iter()
                            .filter_map(|c| row.get(*c).map(|v| (c.to_string(), v.clone())))
                            .collect();
                        Value::Object(projected)
                    })
                    .collect();
            }

            Ok(rows)
        }

        async fn insert_row(&self, table: &str, mut row: Value) -> Result<(), GalleryError> {
            self.fail_if_configured(table)?;
            if row.get("id").is_none() {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                row["id"] = json!(*next_id);
            }
            self.tables
                .lock()
                .unwrap()
                .entry(table.to_string())
                .or_default()
                .push(row);
            Ok(())
        }

        async fn update_rows(
            &self,
            table: &str,
            query: &TableQuery,
            patch: Value,
        ) -> Result<(), GalleryError> {
            self.fail_if_configured(table)?;
            let mut tables = self.tables.lock().unwrap();
            for row in tables.entry(table.to_string()).or_default().iter_mut() {
                if matches(row, query) {
                    if let (Some(target), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
                        for (k, v) in changes {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                }
            }
            Ok(())
        }

        async fn delete_rows(&self, table: &str, query: &TableQuery) -> Result<(), GalleryError> {
            self.fail_if_configured(table)?;
            let mut tables = self.tables.lock().unwrap();
            tables
                .entry(table.to_string())
                .or_default()
                .retain(|row| !matches(row, query));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let query = TableQuery::new()
            .select("id, url, caption, sort")
            .eq("album_id", "5")
            .order_nulls_first("sort", true)
            .order("id", true)
            .limit(10);

        let params = query.to_params();
        assert_eq!(params[0], ("select".to_string(), "id, url, caption, sort".to_string()));
        assert_eq!(params[1], ("album_id".to_string(), "eq.5".to_string()));
        assert_eq!(
            params[2],
            ("order".to_string(), "sort.asc.nullsfirst,id.asc".to_string())
        );
        assert_eq!(params[3], ("limit".to_string(), "10".to_string()));
    }

    #[test]
    fn test_filter_values_keep_type() {
        let as_text = TableQuery::new().eq("album_id", "5");
        let as_number = TableQuery::new().eq("album_id", 5);

        assert_ne!(as_text, as_number);
        assert_eq!(as_text.to_params(), as_number.to_params());
        assert_eq!(filter_text(&json!(true)), "true");
    }

    #[test]
    fn test_backend_message_fields() {
        assert_eq!(
            backend_message(400, r#"{"message":"duplicate key"}"#),
            "duplicate key"
        );
        assert_eq!(
            backend_message(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(backend_message(422, r#"{"msg":"Signups not allowed"}"#), "Signups not allowed");
        assert_eq!(backend_message(502, "Bad gateway"), "Bad gateway");
        assert_eq!(backend_message(500, ""), "HTTP 500");
    }

    #[test]
    fn test_identities() {
        let client = BackendClient::new(
            Client::new(),
            "http://backend.test/".to_string(),
            "anon".to_string(),
            "service".to_string(),
        );
        assert_eq!(client.base_url(), "http://backend.test");
        assert_eq!(client.bearer, "anon");

        let user = client.as_user("user-token");
        assert_eq!(user.bearer, "user-token");
        assert_eq!(user.api_key, "anon");

        let service = user.as_service();
        assert_eq!(service.bearer, "service");
        assert_eq!(service.api_key, "service");

        let no_service = BackendClient::new(
            Client::new(),
            "http://backend.test".to_string(),
            "anon".to_string(),
            String::new(),
        )
        .as_service();
        assert_eq!(no_service.bearer, "anon");
    }

    #[test]
    fn test_rows_into() {
        #[derive(serde::Deserialize)]
        struct Row {
            id: i64,
        }
        let rows: Vec<Row> = rows_into(vec![json!({"id": 1}), json!({"id": 2})]).unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

        let bad: Result<Vec<Row>, _> = rows_into(vec![json!({"id": "x"})]);
        assert!(bad.is_err());
    }
}
