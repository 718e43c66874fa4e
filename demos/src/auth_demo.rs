use dotenv::dotenv;
use fortis_auction::prelude::*;
use std::env;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    pretty_env_logger::init();

    let options = ClientOptions::from_env()?;
    let state_dir = env::var("FORTIS_STATE_DIR").unwrap_or_else(|_| ".fortis".to_string());
    let client = FortisAuction::new_with_options(
        options,
        Arc::new(FileSessionStore::in_dir(&state_dir)),
    );

    println!("Starting auth demo against {}", client.options().base_url);

    // Sign in with known credentials, or register a throwaway account
    let credentials = match (env::var("FORTIS_EMAIL"), env::var("FORTIS_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            println!("Signing in as {}", email);
            Credentials::sign_in(&email, &password)
        }
        _ => {
            let handle = format!("demo_{}", &Uuid::new_v4().simple().to_string()[..8]);
            let email = format!("{}@stud.noroff.no", handle);
            println!("Registering a new account: {}", handle);
            Credentials::sign_up(&handle, &email, "demoPassword123")
        }
    };

    let session = match client.auth().authenticate(credentials).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Authentication failed: {}", e.user_message());
            return Err(e.into());
        }
    };

    if let Some(welcome) = client.auth().take_welcome().await {
        if welcome.is_new {
            println!("Welcome, {}! Your account is ready.", welcome.name);
        } else {
            println!("Welcome back, {}!", welcome.name);
        }
    }
    println!("Credits: {}", session.credits);
    println!("Avatar: {}", session.avatar.url);

    // Refresh from the server and show the public view of ourselves
    let refreshed = client.refresh_session().await?;
    println!("Credits after refresh: {}", refreshed.credits);

    let public = client.public_profile(&session.name).await?;
    println!(
        "{} has {} listings and {} wins",
        public.name, public.listing_count, public.win_count
    );

    for kind in [
        OwnedSectionKind::Listings,
        OwnedSectionKind::Bids,
        OwnedSectionKind::Wins,
    ] {
        match client.owned_section(&session.name, kind).await {
            Ok(section) => println!("{:?}: {} entries", kind, section.len()),
            Err(e) => println!("{:?}: {}", kind, e.user_message()),
        }
    }

    if env::var("FORTIS_KEEP_SESSION").is_err() {
        println!("\nSigning out");
        client.auth().sign_out().await?;
    }

    println!("Auth demo completed");

    Ok(())
}
