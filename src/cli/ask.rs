//! The `ask` command: POST a question to `/query` and render the answer.

use std::error::Error;

use crate::api::models::{QueryMode, QueryRequest, QueryResponse};
use crate::cli::build_session;
use crate::core::config::Config;

pub async fn run_ask(
    question: &str,
    workspace: Option<String>,
    mode: &str,
    doc_ids: Vec<String>,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    let mode = QueryMode::parse(mode)
        .ok_or_else(|| format!("Unknown mode '{mode}'. Use answer, summary, or extract."))?;

    let config = Config::load()?;
    let workspace = workspace.unwrap_or_else(|| config.workspace_or_default());

    let mut session = build_session()?;
    let request = QueryRequest {
        query: question.to_string(),
        workspace,
        doc_ids: if doc_ids.is_empty() {
            None
        } else {
            Some(doc_ids)
        },
        mode,
        verbose,
    };

    let response: QueryResponse = match session.client().post_json("/query", &request).await {
        Ok(response) => response,
        Err(err) => {
            session.handle_unauthorized(&err);
            if err.is_unauthorized() {
                return Err("Session has expired. Log in again with 'fraga login <email>'.".into());
            }
            return Err(format!("Query failed: {err}").into());
        }
    };

    println!("{}", response.answer);

    if !response.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &response.sources {
            println!(
                "  {} (p. {}): {}",
                source.document_name, source.page_number, source.snippet
            );
        }
    }

    println!();
    println!(
        "[workspace: {}, {:.0} ms]",
        response.workspace, response.latency_ms
    );
    Ok(())
}
