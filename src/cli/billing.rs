//! Billing commands: subscription info, checkout, portal.
//!
//! Payment itself happens on the provider's hosted pages; these commands
//! only fetch state and print the URLs the backend hands back.

use std::error::Error;

use crate::api::models::{
    BillingCheckoutRequest, BillingCheckoutResponse, PortalRequest, PortalResponse,
    SubscriptionInfo,
};
use crate::api::ApiError;
use crate::cli::{build_session, BillingCommands};
use crate::session::SessionManager;

/// Where the hosted checkout/portal pages send the user afterwards. The
/// backend treats these as opaque redirect targets.
const RETURN_URL: &str = "http://localhost:3000/app/account";

pub async fn run(command: BillingCommands) -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;

    let result = match command {
        BillingCommands::Info => info(&session).await,
        BillingCommands::Checkout { price_id } => checkout(&session, &price_id).await,
        BillingCommands::Portal => portal(&session).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            session.handle_unauthorized(&err);
            if err.is_unauthorized() {
                Err("Session has expired. Log in again with 'fraga login <email>'.".into())
            } else {
                Err(format!("Could not load billing info: {err}").into())
            }
        }
    }
}

async fn info(session: &SessionManager) -> Result<(), ApiError> {
    let info: SubscriptionInfo = session.client().get_json("/billing/subscription").await?;
    println!("Plan:   {}", info.plan);
    println!("Status: {}", info.status);
    if let Some(period_end) = info.current_period_end {
        if info.cancel_at_period_end {
            println!("Cancels at period end: {}", period_end.format("%Y-%m-%d"));
        } else {
            println!("Renews: {}", period_end.format("%Y-%m-%d"));
        }
    }
    Ok(())
}

async fn checkout(session: &SessionManager, price_id: &str) -> Result<(), ApiError> {
    let request = BillingCheckoutRequest {
        price_id: price_id.to_string(),
        success_url: format!("{RETURN_URL}?success=subscription"),
        cancel_url: format!("{RETURN_URL}?cancel=subscription"),
    };
    let response: BillingCheckoutResponse = session
        .client()
        .post_json("/billing/checkout", &request)
        .await?;
    println!("Open this URL to complete the subscription:");
    println!("{}", response.checkout_url);
    Ok(())
}

async fn portal(session: &SessionManager) -> Result<(), ApiError> {
    let request = PortalRequest {
        return_url: RETURN_URL.to_string(),
    };
    let response: PortalResponse = session
        .client()
        .post_json("/billing/portal", &request)
        .await?;
    println!("Open this URL to manage your subscription:");
    println!("{}", response.portal_url);
    Ok(())
}
