//! Read-only aggregation views: stats, recent queries, workspace activity.
//!
//! The stats fetch is the one place a bounded retry-with-backoff sits on
//! top of the API boundary; the boundary itself never retries.

use std::error::Error;
use std::time::Duration;

use crate::api::models::{RecentQuery, StatsResponse, WorkspaceActivity};
use crate::api::{ApiClient, ApiError};
use crate::cli::build_session;

const STATS_RETRY_ATTEMPTS: u32 = 3;
const STATS_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

pub async fn run_stats() -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;

    let stats = match fetch_stats_with_retry(session.client()).await {
        Ok(stats) => stats,
        Err(err) => {
            session.handle_unauthorized(&err);
            if err.is_unauthorized() {
                return Err("Session has expired. Log in again with 'fraga login <email>'.".into());
            }
            return Err(format!("Could not load usage statistics: {err}").into());
        }
    };

    println!("Plan: {}", stats.plan);
    println!();
    println!("Credits");
    println!("  Balance:           {:.1}", stats.credits.balance);
    if stats.credits.unlimited {
        println!("  Monthly allowance: unlimited");
    } else {
        println!(
            "  This month:        {:.1} used of {:.1} ({:.1} left)",
            stats.credits.monthly_used,
            stats.credits.monthly_allocation,
            stats.credits.monthly_remaining
        );
    }
    println!();
    if stats.workspaces.unlimited {
        println!("Workspaces: {} in use", stats.workspaces.used);
    } else {
        println!(
            "Workspaces: {} of {} in use",
            stats.workspaces.used, stats.workspaces.limit
        );
    }
    Ok(())
}

pub async fn run_recent() -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;

    let recent: Vec<RecentQuery> = match session.client().get_json("/recent-queries").await {
        Ok(recent) => recent,
        Err(err) => {
            session.handle_unauthorized(&err);
            if err.is_unauthorized() {
                return Err("Session has expired. Log in again with 'fraga login <email>'.".into());
            }
            return Err(format!("Could not load recent queries: {err}").into());
        }
    };

    if recent.is_empty() {
        println!("No queries yet.");
        return Ok(());
    }
    for query in &recent {
        println!(
            "{}  [{}]  {}  ({:.0} ms)",
            query.timestamp.format("%Y-%m-%d %H:%M"),
            query.workspace,
            query.query,
            query.latency_ms
        );
    }
    Ok(())
}

pub async fn run_activity() -> Result<(), Box<dyn Error>> {
    let session = build_session()?;

    // Activity is a non-critical view; failures degrade to an empty map.
    let activity: WorkspaceActivity = session
        .client()
        .get_json("/workspace-activity")
        .await
        .unwrap_or_default();

    if activity.is_empty() {
        println!("No activity recorded.");
        return Ok(());
    }

    let mut entries: Vec<_> = activity.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (workspace, count) in entries {
        println!("{workspace}: {count} queries");
    }
    Ok(())
}

/// Retry transient failures (connectivity, timeout, 5xx) a bounded number
/// of times with doubling delay. Application errors return immediately.
async fn fetch_stats_with_retry(client: &ApiClient) -> Result<StatsResponse, ApiError> {
    let mut delay = STATS_RETRY_INITIAL_DELAY;
    let mut attempt = 1;
    loop {
        match client.get_json("/stats").await {
            Ok(stats) => return Ok(stats),
            Err(err) if is_transient(&err) && attempt < STATS_RETRY_ATTEMPTS => {
                tracing::debug!(attempt, "stats fetch failed, retrying: {err}");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_transient(err: &ApiError) -> bool {
    match err {
        ApiError::Network { .. } | ApiError::Timeout { .. } => true,
        ApiError::Status { status, .. } => *status >= 500,
        ApiError::Decode { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification_covers_the_retryable_classes() {
        assert!(is_transient(&ApiError::from_transport("connection refused")));
        assert!(is_transient(&ApiError::timeout(Duration::from_secs(30))));
        assert!(is_transient(&ApiError::from_response(503, "")));
        assert!(!is_transient(&ApiError::from_response(404, "")));
        assert!(!is_transient(&ApiError::from_response(401, "")));
        assert!(!is_transient(&ApiError::Decode {
            message: "bad shape".to_string()
        }));
    }
}
