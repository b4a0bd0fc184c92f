use clap::{Parser, Subcommand};
use std::sync::Arc;
use tunesync::{SpotifyClient, StaticToken};

#[derive(Parser)]
#[command(name = "tunesync-cli")]
#[command(about = "CLI for Tunesync - Spotify library inspection", long_about = None)]
struct Cli {
    /// Spotify access token (can also be set via SPOTIFY_ACCESS_TOKEN env var)
    #[arg(long, env = "SPOTIFY_ACCESS_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated user's profile
    Profile,
    /// List the user's playlists
    Playlists,
    /// Show a playlist with its full track list
    Playlist {
        /// Playlist ID or open.spotify.com URL
        id_or_url: String,
    },
    /// List the user's top tracks
    TopTracks,
    /// List the user's followed artists
    Artists,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let client = SpotifyClient::new(Arc::new(StaticToken::new(cli.token.as_str())));

    match &cli.command {
        Commands::Profile => {
            let profile = client.profile().await?;
            println!(
                "{} (ID: {})",
                profile.display_name.as_deref().unwrap_or("<unnamed>"),
                profile.reference.id
            );
            println!("   Followers: {}", profile.followers);
            if let Some(country) = &profile.country {
                println!("   Country: {country}");
            }
        }
        Commands::Playlists => {
            let playlists = client.playlists().await?;
            for (i, playlist) in playlists.iter().enumerate() {
                println!(
                    "{}. {} - {} tracks (ID: {})",
                    i + 1,
                    playlist.name,
                    playlist
                        .track_count
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    playlist.reference.id
                );
            }
        }
        Commands::Playlist { id_or_url } => {
            // Accept either a bare ID or an open.spotify.com URL
            let id = if id_or_url.contains("spotify.com") {
                id_or_url
                    .rsplit('/')
                    .next()
                    .map(|tail| tail.split('?').next().unwrap_or(tail))
                    .unwrap_or(id_or_url)
            } else {
                id_or_url
            };

            let playlist = client.playlist(id).await?;
            println!("{} (snapshot: {})", playlist.name, playlist.snapshot_id);
            if let Some(description) = &playlist.description {
                println!("   {description}");
            }
            if !playlist.tracks.is_complete() {
                println!(
                    "   warning: materialized {} of {} reported tracks",
                    playlist.track_count(),
                    playlist.tracks.total
                );
            }
            for track in &playlist.tracks.items {
                println!(
                    "{:>4}. {} - {} [{}]{}",
                    track.position.map(|p| p + 1).unwrap_or_default(),
                    track.artists_string(", "),
                    track.name,
                    track.duration_formatted(),
                    if track.is_local { " (local)" } else { "" }
                );
            }
        }
        Commands::TopTracks => {
            let tracks = client.top_tracks().await?;
            for (i, track) in tracks.iter().enumerate() {
                println!(
                    "{}. {} - {} [{}]",
                    i + 1,
                    track.artists_string(", "),
                    track.name,
                    track.duration_formatted()
                );
            }
        }
        Commands::Artists => {
            let artists = client.followed_artists().await?;
            for (i, artist) in artists.iter().enumerate() {
                println!("{}. {} (ID: {})", i + 1, artist.name, artist.reference.id);
            }
        }
    }

    Ok(())
}
