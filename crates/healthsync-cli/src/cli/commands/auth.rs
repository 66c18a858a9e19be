//! Auth command handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use healthsync_core::api::types::{RegisterRequest, Role};
use healthsync_core::config::Config;
use healthsync_core::credentials::mask_token;

pub struct RegisterArgs {
    pub email: String,
    pub password: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
}

pub async fn login(config: &Config, email: &str, password: Option<String>) -> Result<()> {
    let password = resolve_password(password)?;

    let mut session = super::session(config)?;
    let user = match session.login(email, &password).await {
        Ok(user) => user,
        Err(err) => anyhow::bail!("{err}"),
    };

    println!("Logged in as {} ({})", user.full_name, user.email);
    Ok(())
}

pub async fn register(config: &Config, args: RegisterArgs) -> Result<()> {
    // Role-specific validation is the backend's; its `detail` surfaces as-is.
    let password = resolve_password(args.password)?;

    let session = super::session(config)?;
    let request = RegisterRequest {
        email: args.email,
        password,
        full_name: args.full_name,
        role: args.role,
        license_number: args.license_number,
        specialty: args.specialty,
        date_of_birth: args.date_of_birth,
        phone: args.phone,
    };

    let user = match session.register(&request).await {
        Ok(user) => user,
        Err(err) => anyhow::bail!("{err}"),
    };

    println!("Registered {} as {}.", user.email, user.role);
    println!("Run `healthsync login {}` to sign in.", user.email);
    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let mut session = super::session(config)?;
    session.bootstrap().await?;

    let was_authenticated = session.is_authenticated();
    session.logout()?;

    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let session = super::authenticated_session(config).await?;

    // The gate guarantees an identity and a token here.
    let user = session.current_user().context("no identity after gate")?;
    let token = session.token().context("no token after gate")?;

    println!("{} <{}>", user.full_name, user.email);
    println!("Role:   {}", user.role);
    if let Some(license) = &user.license_number {
        println!("License: {license}");
    }
    if let Some(specialty) = &user.specialty {
        println!("Specialty: {specialty}");
    }
    println!("Token:  {}", mask_token(token));
    Ok(())
}

/// Password resolution order: flag/env value, then interactive prompt.
fn resolve_password(provided: Option<String>) -> Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    print!("Password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("No password provided");
    }
    Ok(password)
}
