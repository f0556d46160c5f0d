use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use setlist2playlist::{cli, config, context::AppContext, enable_debug_output, error, warning};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print diagnostic output
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in to Spotify and store the session
    Auth,

    /// Show the songs of a setlist.fm setlist
    Setlist(SetlistOptions),

    #[clap(about = "Create a Spotify playlist from a setlist.fm setlist")]
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SetlistOptions {
    /// setlist.fm set URL
    #[clap(long)]
    url: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// setlist.fm set URL to create a playlist from
    #[clap(long)]
    url: String,

    /// Playlist name (defaults to the setlist title)
    #[clap(long)]
    name: Option<String>,

    /// Playlist description
    #[clap(long)]
    description: Option<String>,

    /// Create the playlist as private
    #[clap(long)]
    private: bool,

    /// Only keep matches whose title contains the setlist title
    #[clap(long)]
    strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!("Cannot load .env file. Err: {}", e);
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    if cli.verbose || config.debug_enabled() {
        enable_debug_output();
    }

    let ctx = AppContext::new(config);

    match cli.command {
        Command::Auth => cli::auth(&ctx).await,
        Command::Setlist(opt) => cli::setlist(&ctx, &opt.url).await,
        Command::Playlist(opt) => {
            cli::playlist(
                &ctx,
                cli::PlaylistOptions {
                    url: opt.url,
                    name: opt.name,
                    description: opt.description,
                    private: opt.private,
                    strict: opt.strict,
                },
            )
            .await
        }
        Command::Completions(_) => {}
    }
}
