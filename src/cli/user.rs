//! Account commands: login, register, logout, whoami.

use std::error::Error;
use std::io::{self, BufRead, Write};

use crate::cli::build_session;
use crate::session::SessionState;

pub async fn login(email: &str, password: Option<String>) -> Result<(), Box<dyn Error>> {
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    let mut session = build_session()?;
    let identity = session
        .login(email, &password)
        .await
        .map_err(|e| format!("Login failed: {e}"))?;
    println!("✅ Logged in as {} <{}>", identity.name, identity.email);
    Ok(())
}

pub async fn register(
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    let mut session = build_session()?;
    let identity = session
        .register(name, email, &password)
        .await
        .map_err(|e| format!("Registration failed: {e}"))?;
    println!("✅ Account created. Logged in as {} <{}>", identity.name, identity.email);
    Ok(())
}

pub fn logout() -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;
    session.logout()?;
    println!("✅ Logged out");
    Ok(())
}

pub async fn whoami() -> Result<(), Box<dyn Error>> {
    let mut session = build_session()?;

    if matches!(session.state(), SessionState::Anonymous) {
        println!("Not logged in. Use 'fraga login <email>' to sign in.");
        return Ok(());
    }

    match session.me().await {
        Ok(identity) => {
            println!("{} <{}>", identity.name, identity.email);
            if let Some(plan) = &identity.plan {
                println!("Plan: {plan}");
            }
            Ok(())
        }
        Err(err) if err.is_unauthorized() => {
            println!("Session has expired. Log in again with 'fraga login <email>'.");
            Ok(())
        }
        Err(err) => Err(format!("Could not fetch account info: {err}").into()),
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error>> {
    print!("{prompt}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
