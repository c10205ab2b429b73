//! Workspace CRUD against `/workspaces[/:id]`.

use std::error::Error;

use crate::api::models::{CreateWorkspaceRequest, UpdateWorkspaceRequest, Workspace};
use crate::api::ApiError;
use crate::cli::{build_session, WorkspaceCommands};
use crate::session::SessionManager;

pub async fn run(command: WorkspaceCommands) -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;

    let result = match command {
        WorkspaceCommands::List => list(&session).await,
        WorkspaceCommands::Create { name } => create(&session, &name).await,
        WorkspaceCommands::Rename { id, name } => rename(&session, &id, &name).await,
        WorkspaceCommands::Delete { id } => delete(&session, &id).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            session.handle_unauthorized(&err);
            if err.is_unauthorized() {
                Err("Session has expired. Log in again with 'fraga login <email>'.".into())
            } else {
                Err(format!("Workspace operation failed: {err}").into())
            }
        }
    }
}

async fn list(session: &SessionManager) -> Result<(), ApiError> {
    let workspaces: Vec<Workspace> = session.client().get_json("/workspaces").await?;
    if workspaces.is_empty() {
        println!("No workspaces yet. Create one with 'fraga workspace create <name>'.");
        return Ok(());
    }
    for workspace in &workspaces {
        println!(
            "{}  {} ({} documents)",
            workspace.id, workspace.name, workspace.document_count
        );
    }
    Ok(())
}

async fn create(session: &SessionManager, name: &str) -> Result<(), ApiError> {
    let request = CreateWorkspaceRequest {
        name: name.to_string(),
    };
    let workspace: Workspace = session.client().post_json("/workspaces", &request).await?;
    println!("✅ Created workspace '{}' ({})", workspace.name, workspace.id);
    Ok(())
}

async fn rename(session: &SessionManager, id: &str, name: &str) -> Result<(), ApiError> {
    let request = UpdateWorkspaceRequest {
        name: name.to_string(),
    };
    let workspace: Workspace = session
        .client()
        .put_json(&format!("/workspaces/{id}"), &request)
        .await?;
    println!("✅ Renamed workspace {} to '{}'", workspace.id, workspace.name);
    Ok(())
}

async fn delete(session: &SessionManager, id: &str) -> Result<(), ApiError> {
    session.client().delete(&format!("/workspaces/{id}")).await?;
    println!("✅ Deleted workspace {id}");
    Ok(())
}
