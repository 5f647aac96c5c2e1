mod config;

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_state::{
    use_auth, use_events, AuthProvider, EventsProvider, InMemoryBackend, UiScope,
};
use serde::Serialize;
use shared::protocol::{EventFilters, LoginCredentials, NewEvent};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "console.toml")]
    config: PathBuf,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    filter_category: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(password) = args.password {
        settings.password = password;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let backend = Arc::new(InMemoryBackend::new());
    backend
        .add_account(&settings.display_name, &settings.email, &settings.password)
        .await
        .context("failed to register demo account")?;
    for event in load_seed_events(settings.seed_events.as_ref())? {
        backend.seed_event(&event, None).await;
    }

    let root = UiScope::root();
    let mut session = AuthProvider::mount(&root, backend.clone());
    session.initialized().await;
    let events_mount = EventsProvider::mount(&session.scope, backend.clone());
    let page = events_mount.scope.child();

    let auth = use_auth(&page)?;
    let events = use_events(&page)?;

    let user = auth
        .login(&LoginCredentials::new(&settings.email, &settings.password))
        .await
        .context("sign-in failed")?;
    info!(user_id = %user.id, email = %user.email, "console session ready");

    let filters = args.filter_category.map(EventFilters::by_category);
    if let Some(filters) = &filters {
        events.set_filters(filters.clone());
    }
    events.fetch_events(filters).await;

    let created = events
        .create_event(&NewEvent {
            description: Some("Created from the console driver".to_string()),
            ..NewEvent::titled("Console check-in")
        })
        .await
        .context("failed to create event")?;
    events.fetch_event(&created.id).await;

    let joinable = events
        .snapshot()
        .events
        .into_iter()
        .find(|event| event.organizer_id.as_ref() != Some(&user.id));
    if let Some(event) = joinable {
        match events.join_event(&event.id).await {
            Ok(()) => info!(event_id = %event.id, "joined event"),
            Err(error) => warn!(event_id = %event.id, %error, "could not join event"),
        }
    }
    events.fetch_my_events().await;

    print_snapshot("session", &auth.snapshot())?;
    print_snapshot("events", &events.snapshot())?;

    auth.logout().await;
    print_snapshot("session", &auth.snapshot())?;
    Ok(())
}

fn load_seed_events(path: Option<&PathBuf>) -> Result<Vec<NewEvent>> {
    let Some(path) = path else {
        return Ok(default_seed_events());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed events '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid seed events file '{}'", path.display()))
}

fn default_seed_events() -> Vec<NewEvent> {
    vec![
        NewEvent {
            category: Some("Music".to_string()),
            location: Some("Loring Park".to_string()),
            ..NewEvent::titled("Open-air jazz")
        },
        NewEvent {
            category: Some("Community".to_string()),
            max_attendees: Some(12),
            ..NewEvent::titled("Neighborhood cleanup")
        },
    ]
}

fn print_snapshot(label: &str, state: &impl Serialize) -> Result<()> {
    println!("{label}: {}", serde_json::to_string_pretty(state)?);
    Ok(())
}
