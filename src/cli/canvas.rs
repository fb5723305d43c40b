//! Canvas CLI commands
//!
//! Every command runs one short session: open the store, perform a single
//! lifecycle operation through the controller, print the result.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use drawbook_session::{DrawingSurface, MemorySurface, SessionController};
use drawbook_store::{CanvasDocument, DocumentStore, Preferences, Snapshot};

use super::Commands;
use crate::config::AppConfig;

/// Run a canvas subcommand.
pub async fn run(cmd: Commands, config: &AppConfig) -> Result<()> {
    let mut session = open_session(config).await?;

    let result = match cmd {
        Commands::List => {
            list(session.canvases());
            Ok(())
        }
        Commands::New => new(&mut session).await,
        Commands::Show { id } => show(&session, &id).await,
        Commands::Save { id, scene } => save(&mut session, &id, &scene).await,
        Commands::Export { id, out } => export(&mut session, &id, &out).await,
        Commands::Rename { id, name } => rename(&mut session, &id, &name).await,
        Commands::Delete { id, yes } => delete(&mut session, &id, yes).await,
        Commands::Theme { value } => theme(config, value),
    };

    session.store().close().await;
    result
}

/// Show or set the theme preference.
pub fn theme(config: &AppConfig, value: Option<String>) -> Result<()> {
    let mut preferences = load_preferences(config)?;
    match value {
        Some(value) => {
            preferences.set_theme(&value)?;
            println!("Theme set to {value}");
        }
        None => println!("{}", preferences.theme()),
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

fn load_preferences(config: &AppConfig) -> Result<Preferences> {
    let preferences = Preferences::in_dir(&config.storage.data_dir())
        .context("Failed to load preferences")?
        .with_default_theme(&config.theme.default);
    Ok(preferences)
}

async fn open_session(config: &AppConfig) -> Result<SessionController> {
    let data_dir = config.storage.data_dir();
    let store =
        DocumentStore::in_dir(&data_dir).with_max_connections(config.storage.max_connections);

    let mut session = SessionController::new(Arc::new(store), load_preferences(config)?);
    session
        .start()
        .await
        .with_context(|| format!("Failed to open canvases in {}", data_dir.display()))?;
    Ok(session)
}

async fn open(session: &mut SessionController, id: &str) -> Result<()> {
    if session.open_by_id(id).await?.is_none() {
        bail!("No canvas with id '{id}'");
    }
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%x %H:%M").to_string(),
        None => "-".to_string(),
    }
}

fn confirm(prompt: &str) -> bool {
    inquire::Confirm::new(prompt)
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

// ── Commands ─────────────────────────────────────────────────────────

fn list(canvases: &[CanvasDocument]) {
    if canvases.is_empty() {
        println!("No canvases yet. Create one with `drawbook new`.");
        return;
    }

    println!("{:<28} {:<28} MODIFIED", "NAME", "ID");
    for doc in canvases {
        println!(
            "{:<28} {:<28} {}",
            doc.name,
            doc.id,
            format_timestamp(doc.timestamp)
        );
    }
}

async fn new(session: &mut SessionController) -> Result<()> {
    let doc = session.create_canvas().await?;
    println!("Created \"{}\" ({})", doc.name, doc.id);
    Ok(())
}

async fn show(session: &SessionController, id: &str) -> Result<()> {
    let doc = session
        .store()
        .get(id)
        .await?
        .with_context(|| format!("No canvas with id '{id}'"))?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

async fn save(session: &mut SessionController, id: &str, scene_path: &Path) -> Result<()> {
    let content = fs::read_to_string(scene_path)
        .with_context(|| format!("Failed to read {}", scene_path.display()))?;
    let scene: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a scene file", scene_path.display()))?;

    open(session, id).await?;

    // The surface starts on the stored scene, then the file replaces it
    let mut surface = MemorySurface::new();
    session.attach_surface(Box::new(surface.clone()));
    surface.load_scene(&scene);
    session.on_surface_change(&scene.app_state);

    let doc = session.save().await?;
    println!(
        "Saved \"{}\" ({} elements, {} files)",
        doc.name,
        doc.elements.len(),
        doc.files.len()
    );
    Ok(())
}

async fn export(session: &mut SessionController, id: &str, out: &Path) -> Result<()> {
    let surface = MemorySurface::new();
    session.attach_surface(Box::new(surface.clone()));
    open(session, id).await?;

    let content = serde_json::to_string_pretty(&surface.scene())?;
    fs::write(out, content).with_context(|| format!("Failed to write {}", out.display()))?;

    println!("Exported \"{}\" to {}", session.display_name(), out.display());
    Ok(())
}

async fn rename(session: &mut SessionController, id: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name must not be blank");
    }
    open(session, id).await?;
    session.rename(name).await?;
    println!("Renamed {id} to \"{}\"", session.display_name());
    Ok(())
}

async fn delete(session: &mut SessionController, id: &str, yes: bool) -> Result<()> {
    let Some(name) = session
        .canvases()
        .iter()
        .find(|doc| doc.id == id)
        .map(|doc| doc.name.clone())
    else {
        bail!("No canvas with id '{id}'");
    };

    let prompt = format!("Delete \"{name}\"? This cannot be undone.");
    let deleted = session
        .delete_canvas(id, |_| yes || confirm(&prompt))
        .await?;

    if deleted {
        println!("Deleted \"{name}\"");
    } else {
        println!("Delete cancelled.");
    }
    Ok(())
}
