//! Typed wire payloads for the backend's REST contract.
//!
//! Field names follow the backend exactly: snake_case for the query, auth,
//! stats, and credits endpoints, camelCase for the billing endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ---- query ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Answer,
    Summary,
    Extract,
}

impl QueryMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "answer" => Some(QueryMode::Answer),
            "summary" => Some(QueryMode::Summary),
            "extract" => Some(QueryMode::Extract),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_ids: Option<Vec<String>>,
    pub mode: QueryMode,
    pub verbose: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub document_name: String,
    pub page_number: u32,
    pub snippet: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub mode: QueryMode,
    pub latency_ms: f64,
    pub workspace: String,
}

// ---- health ----

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub workspace: String,
    pub indexed_chunks: u64,
    pub version: String,
}

// ---- workspaces ----

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub document_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateWorkspaceRequest {
    pub name: String,
}

// ---- stats / activity ----

#[derive(Debug, Clone, Deserialize)]
pub struct CreditsUsage {
    pub balance: f64,
    pub monthly_allocation: f64,
    pub monthly_used: f64,
    pub monthly_remaining: f64,
    /// None means the plan is unlimited.
    #[serde(default)]
    pub credits_per_month: Option<f64>,
    #[serde(default)]
    pub unlimited: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceUsage {
    pub used: u64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub unlimited: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    pub plan: String,
    pub credits: CreditsUsage,
    pub workspaces: WorkspaceUsage,
    #[serde(default)]
    pub features: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    pub query: String,
    pub workspace: String,
    pub mode: QueryMode,
    pub latency_ms: f64,
    pub timestamp: DateTime<Utc>,
}

/// Query counts per workspace. Returned by `/workspace-activity`;
/// non-critical, so callers may degrade to an empty map on failure.
pub type WorkspaceActivity = HashMap<String, u64>;

// ---- auth ----

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Identity,
}

// ---- billing ----

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub plan: String,
    /// active | canceled | past_due | trialing
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCheckoutRequest {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCheckoutResponse {
    pub checkout_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalRequest {
    pub return_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalResponse {
    pub portal_url: String,
}

// ---- credits ----

#[derive(Debug, Clone, Deserialize)]
pub struct CreditsBalance {
    pub current_balance: f64,
    pub monthly_allocation: f64,
    pub month_used: f64,
    pub month_remaining: f64,
    pub plan: String,
    #[serde(default)]
    pub expires_soon: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditTransaction {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// monthly_allocation | usage | purchase | expiration | refund | bonus
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub description: String,
    pub balance_after: f64,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditsHistory {
    pub transactions: Vec<CreditTransaction>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditsCheckoutRequest {
    /// "credits_100" | "credits_500" | ...
    pub package_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditsCheckoutResponse {
    pub checkout_url: String,
}
