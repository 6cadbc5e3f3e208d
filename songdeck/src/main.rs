//! songdeck - command-line front end for the song catalog
//!
//! Runs one catalog operation per invocation and prints the resulting
//! notifications.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songdeck::{CatalogClient, CatalogError, LoadStatus};
use songdeck_common::config::{ClientConfig, ConfigOverrides, Profile};
use songdeck_common::forms::EditSongForm;
use songdeck_common::{ImageUpload, Language, MessageKey, Song, SongFormData};

/// Command-line arguments for songdeck
#[derive(Parser, Debug)]
#[command(name = "songdeck")]
#[command(about = "Manage a song catalog through its HTTP API")]
#[command(version)]
struct Args {
    /// Catalog API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Host serving cover images (defaults to the API host)
    #[arg(long, global = true)]
    asset_url: Option<String>,

    /// Message language (en, es)
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Deployment profile (development, production)
    #[arg(long, global = true)]
    profile: Option<Profile>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "SONGDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all songs
    List,
    /// Add a song
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        artist: String,
        /// Cover image file
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Edit an existing song
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        /// Replacement cover image file
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Delete a song
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries songs and notifications
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songdeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let overrides = ConfigOverrides {
        api_url: args.api_url,
        asset_url: args.asset_url,
        language: args.lang,
        profile: args.profile,
        config_path: args.config,
        request_timeout: args.timeout.map(Duration::from_secs),
    };
    let config = ClientConfig::resolve(&overrides).context("Failed to resolve configuration")?;
    info!(
        api = %config.api_base_url,
        language = %config.language,
        "Using Catalog API"
    );

    let client =
        CatalogClient::from_config(&config).context("Failed to create Catalog API client")?;
    let mut notifications = client.subscribe();

    let outcome = run(&client, &config, args.command).await;

    while let Ok(notification) = notifications.try_recv() {
        println!("{}", notification.message);
    }
    outcome
}

async fn run(client: &CatalogClient, config: &ClientConfig, command: Command) -> Result<()> {
    let language = client.language();

    match command {
        Command::List => {
            let songs = client.list().await;
            if client.load_status() == LoadStatus::Unavailable {
                warn!("Catalog API unavailable");
            }
            if songs.is_empty() {
                println!("{}", MessageKey::EmptyLibrary.text(language));
            }
            for song in songs.iter() {
                print_song(song, &config.asset_base_url);
            }
        }
        Command::Add {
            name,
            artist,
            cover,
        } => {
            let mut data = SongFormData::new(name, artist);
            if let Some(path) = cover {
                data = data.with_image(read_cover(&path)?);
            }
            let song = client
                .add(&data)
                .await
                .map_err(|e| localize(e, language))?;
            print_song(&song, &config.asset_base_url);
        }
        Command::Edit {
            id,
            name,
            artist,
            cover,
        } => {
            let songs = client.list().await;
            let current = songs
                .iter()
                .find(|s| s.id == id)
                .with_context(|| format!("No song with id {}", id))?;

            let mut form = EditSongForm::from_song(current);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(artist) = artist {
                form.artist = artist;
            }
            if let Some(path) = cover {
                form.cover = Some(read_cover(&path)?);
            }

            let song = form
                .apply(current)
                .map_err(|e| localize(e.into(), language))?;
            let updated = client
                .edit(&song)
                .await
                .map_err(|e| localize(e, language))?;
            print_song(&updated, &config.asset_base_url);
        }
        Command::Delete { id } => {
            client.delete(&id).await?;
        }
    }

    Ok(())
}

fn read_cover(path: &std::path::Path) -> Result<ImageUpload> {
    ImageUpload::from_path(path)
        .with_context(|| format!("Failed to read cover image {}", path.display()))
}

/// Validation errors become localized field messages
fn localize(err: CatalogError, language: Language) -> anyhow::Error {
    match err {
        CatalogError::Validation(errors) => {
            let fields = errors
                .localized(language)
                .into_iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect::<Vec<_>>()
                .join("; ");
            anyhow!(fields)
        }
        other => other.into(),
    }
}

fn print_song(song: &Song, asset_base_url: &str) {
    println!(
        "{}\t{}\t{}\t{}",
        song.id,
        song.name,
        song.artist,
        song.cover_url(asset_base_url).unwrap_or_default()
    );
}
