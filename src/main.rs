use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tune2tube::{cli, config, oauth::OAuthProvider, types::Visibility, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify or YouTube
    Auth(AuthOptions),

    /// Create a YouTube playlist from a Spotify playlist
    Create(CreateArgs),

    /// Continue a run that stopped early (quota, error, Ctrl-C)
    Resume(ResumeOptions),

    /// Reconcile playlists saved with `create --save-to-sync`
    Sync(SyncOptions),

    /// List your Spotify playlists and their ids
    Playlists(PlaylistsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    #[clap(value_enum)]
    provider: OAuthProvider,
}

#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// Spotify playlist id, or `current_user_saved_tracks` for Liked Songs
    spotify_playlist_id: String,

    /// Create a public playlist
    #[clap(long)]
    public: bool,

    /// Create a private playlist (default)
    #[clap(long)]
    private: bool,

    /// Name of the YouTube playlist to be created
    #[clap(long, short)]
    name: Option<String>,

    /// Description of the playlist
    #[clap(long, short)]
    description: Option<String>,

    /// Only print the playlist link, no progress output
    #[clap(long, short = 'l')]
    only_link: bool,

    /// Save to the list of playlists to sync
    #[clap(long, short)]
    save_to_sync: bool,

    /// Whose Liked Songs these are: names the playlist after them and
    /// exports the tracks to JSON
    #[clap(long, short)]
    user: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ResumeOptions {
    /// Only print the playlist link, no progress output
    #[clap(long, short = 'l')]
    only_link: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Sync a single saved Spotify playlist instead of all of them
    #[clap(long)]
    playlist: Option<String>,

    /// Only print the playlist links, no progress output
    #[clap(long, short = 'l')]
    only_link: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists whose name contains this text
    #[clap(long)]
    search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load .env file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.provider).await,
        Command::Create(opt) => {
            cli::create(cli::CreateOptions {
                source_playlist_id: opt.spotify_playlist_id,
                visibility: Visibility::from_flags(opt.public, opt.private),
                name: opt.name,
                description: opt.description,
                only_link: opt.only_link,
                save_to_sync: opt.save_to_sync,
                user: opt.user,
            })
            .await
        }
        Command::Resume(opt) => cli::resume(opt.only_link).await,
        Command::Sync(opt) => cli::sync(opt.playlist, opt.only_link).await,
        Command::Playlists(opt) => cli::playlists(opt.search).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
