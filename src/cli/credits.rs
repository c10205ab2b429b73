//! Credits commands: balance, history, purchase checkout.

use std::error::Error;

use crate::api::models::{
    CreditsBalance, CreditsCheckoutRequest, CreditsCheckoutResponse, CreditsHistory,
};
use crate::api::ApiError;
use crate::cli::{build_session, CreditsCommands};
use crate::session::SessionManager;

pub async fn run(command: CreditsCommands) -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;

    let result = match command {
        CreditsCommands::Balance => balance(&session).await,
        CreditsCommands::History => history(&session).await,
        CreditsCommands::Buy { package_id } => buy(&session, &package_id).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            session.handle_unauthorized(&err);
            if err.is_unauthorized() {
                Err("Session has expired. Log in again with 'fraga login <email>'.".into())
            } else {
                Err(format!("Could not load credits info: {err}").into())
            }
        }
    }
}

async fn balance(session: &SessionManager) -> Result<(), ApiError> {
    let balance: CreditsBalance = session.client().get_json("/credits/balance").await?;
    println!("Balance: {:.1} credits (plan: {})", balance.current_balance, balance.plan);
    println!(
        "This month: {:.1} used of {:.1} ({:.1} left)",
        balance.month_used, balance.monthly_allocation, balance.month_remaining
    );
    if !balance.expires_soon.is_empty() {
        println!("⚠️  Some credits expire within 30 days.");
    }
    Ok(())
}

async fn history(session: &SessionManager) -> Result<(), ApiError> {
    let history: CreditsHistory = session.client().get_json("/credits/history").await?;
    if history.transactions.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    for tx in &history.transactions {
        println!(
            "{}  {:+8.1}  {:18}  {}  (balance {:.1})",
            tx.timestamp.format("%Y-%m-%d"),
            tx.amount,
            tx.kind,
            tx.description,
            tx.balance_after
        );
    }
    println!("{} of {} transactions shown", history.transactions.len(), history.total);
    Ok(())
}

async fn buy(session: &SessionManager, package_id: &str) -> Result<(), ApiError> {
    let request = CreditsCheckoutRequest {
        package_id: package_id.to_string(),
    };
    let response: CreditsCheckoutResponse = session
        .client()
        .post_json("/credits/checkout", &request)
        .await?;
    println!("Open this URL to complete the purchase:");
    println!("{}", response.checkout_url);
    Ok(())
}
