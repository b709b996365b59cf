use clap::{Parser, Subcommand, ValueEnum};
use spotlas::{Resource, ResourceKind, SearchResults, Spotify, DEFAULT_SEARCH_LIMIT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spotlas-cli")]
#[command(about = "CLI for spotlas - Spotify metadata, search and playlists", long_about = None)]
struct Cli {
    /// Spotify application client ID (can also be set via SPOTIFY_CLIENT_ID)
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    client_id: String,

    /// Spotify application client secret (can also be set via SPOTIFY_CLIENT_SECRET)
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Market for artist top tracks
    #[arg(short, long, env = "SPOTIFY_MARKET", default_value = spotlas::DEFAULT_MARKET)]
    market: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print whatever a share link points at
    Get {
        /// Share link (open.spotify.com URL or spotify: URI)
        link: String,
    },
    /// Search for content
    Search {
        /// Search query (filter syntax like "artist:… year:…" works too)
        query: String,

        /// Kind of content to search
        #[arg(short, long, value_enum, default_value_t = SearchType::Track)]
        r#type: SearchType,

        /// Limit results
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// Run the browser consent flow and cache the user token
    Login {
        /// Discard any cached token and prompt for consent again
        #[arg(long)]
        fresh: bool,
    },
    /// Print the authorized user's profile
    Me,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum SearchType {
    Track,
    Album,
    Artist,
    Playlist,
}

impl From<SearchType> for ResourceKind {
    fn from(t: SearchType) -> Self {
        match t {
            SearchType::Track => ResourceKind::Track,
            SearchType::Album => ResourceKind::Album,
            SearchType::Artist => ResourceKind::Artist,
            SearchType::Playlist => ResourceKind::Playlist,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before clap resolves env-backed args
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,spotlas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut spotify = Spotify::new(&cli.client_id, &cli.client_secret)?;
    spotify.set_market(&cli.market);

    match &cli.command {
        Commands::Get { link } => {
            let resource = spotify.get(link).await?;
            print_resource(&resource);
        }
        Commands::Search {
            query,
            r#type,
            limit,
        } => {
            println!("Searching for '{}'...", query);
            let kind = ResourceKind::from(*r#type);
            let results = spotify.search(query.as_str(), &[kind], *limit).await?;
            print_search(&results, kind);
        }
        Commands::Login { fresh } => {
            spotify.set_default_token_cache()?;
            if *fresh {
                spotify.forget_user_token().await?;
            }

            let me = spotify.get_me().await?;
            println!("✅ Logged in as {} (ID: {})", me.display_name, me.id);
            if let Some(path) = spotify.token_cache_path() {
                println!("   Token cached at {}", path.display());
            }
        }
        Commands::Me => {
            spotify.set_default_token_cache()?;
            let me = spotify.get_me().await?;

            println!("{} (ID: {})", me.display_name, me.id);
            println!("   Followers: {}", me.followers);
            if let Some(country) = &me.country {
                println!("   Country: {}", country);
            }
            if let Some(product) = &me.product {
                println!("   Product: {}", product);
            }
            if let Some(email) = &me.email {
                println!("   Email: {}", email);
            }
        }
    }

    Ok(())
}

fn print_resource(resource: &Resource) {
    match resource {
        Resource::Track(track) => {
            println!("Track: {} - {}", track.artists_string(", "), track.name);
            println!(
                "   Album: {} | Duration: {}",
                track.album.name,
                track.duration_formatted()
            );
            println!("   {}", track.url());
        }
        Resource::Album(album) => {
            println!(
                "Album: {} - {} ({})",
                album.artists_string(", "),
                album.name,
                album.release_date.year
            );
            println!("   {} tracks | {}", album.total_tracks, album.url());
            for track in &album.tracks {
                println!("   {:2}. {}", track.track_number, track.name);
            }
        }
        Resource::Artist(artist) => {
            println!("Artist: {} ({} followers)", artist.name, artist.followers);
            if !artist.genres.is_empty() {
                println!("   Genres: {}", artist.genres.join(", "));
            }
            println!("   {}", artist.url());
            if !artist.top_tracks.is_empty() {
                println!("   Top tracks:");
                for (i, track) in artist.top_tracks.iter().enumerate() {
                    println!("   {}. {}", i + 1, track.name);
                }
            }
        }
        Resource::Playlist(playlist) => {
            println!(
                "Playlist: {} by {}",
                playlist.name, playlist.owner.display_name
            );
            if let Some(description) = &playlist.description {
                if !description.is_empty() {
                    println!("   {}", description);
                }
            }
            println!("   {} tracks | {}", playlist.total_tracks, playlist.url());
            for (i, item) in playlist.tracks.iter().enumerate() {
                println!(
                    "   {}. {} - {}",
                    i + 1,
                    item.track.artists_string(", "),
                    item.track.name
                );
            }
        }
        Resource::User(user) => {
            println!("User: {} (ID: {})", user.display_name, user.id);
            println!("   Followers: {}", user.followers);
            println!("   {}", user.url());
        }
    }
}

fn print_search(results: &SearchResults, kind: ResourceKind) {
    match kind {
        ResourceKind::Track => {
            for (i, track) in results.tracks.iter().enumerate() {
                println!(
                    "{}. {} - {} (ID: {})",
                    i + 1,
                    track.artists_string(", "),
                    track.name,
                    track.id
                );
            }
        }
        ResourceKind::Album => {
            for (i, album) in results.albums.iter().enumerate() {
                println!(
                    "{}. {} - {} (ID: {})",
                    i + 1,
                    album.artists_string(", "),
                    album.name,
                    album.id
                );
            }
        }
        ResourceKind::Artist => {
            for (i, artist) in results.artists.iter().enumerate() {
                println!("{}. {} (ID: {})", i + 1, artist.name, artist.id);
            }
        }
        ResourceKind::Playlist => {
            for (i, playlist) in results.playlists.iter().enumerate() {
                println!(
                    "{}. {} by {} (ID: {})",
                    i + 1,
                    playlist.name,
                    playlist.owner.display_name,
                    playlist.id
                );
            }
        }
        // user search is rejected before results exist
        ResourceKind::User => {}
    }
}
