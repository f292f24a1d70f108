use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use creator_sync::api::{ApiClient, LikeState, ReactionTarget};
use creator_sync::config::Config;
use creator_sync::lifecycle::ViewScope;
use creator_sync::logging::init_tracing;
use creator_sync::notify::{ToastLevel, ToastQueue};
use creator_sync::optimistic::MutationOutcome;
use creator_sync::session::{Session, User};
use creator_sync::views::{ActionResult, FlashSaleBoard, LikeButton, LiveStreamList};

#[derive(Debug, Parser)]
#[command(name = "creator-sync", version, about = "Watch and act on creator platform data")]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List flash sales with remaining stock.
    FlashSales {
        /// Keep refreshing until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },
    /// List live streams with viewer counts.
    Live {
        #[arg(long)]
        watch: bool,
    },
    /// Toggle a like on a video.
    Like {
        content_id: String,
        /// Currently displayed like count.
        #[arg(long, default_value_t = 0)]
        likes: u64,
        /// The video is currently liked.
        #[arg(long)]
        liked: bool,
    },
}

fn session_from_env() -> Session {
    match std::env::var("CREATOR_SYNC_TOKEN") {
        Ok(token) if !token.is_empty() => {
            let id = std::env::var("CREATOR_SYNC_USER").unwrap_or_else(|_| "me".to_string());
            Session::authenticated(
                User {
                    display_name: id.clone(),
                    id,
                },
                token,
            )
        }
        _ => Session::anonymous(),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Config::load().context("loading default config"),
    }
}

fn flush_toasts(toasts: &ToastQueue) {
    for toast in toasts.drain() {
        let prefix = match toast.level {
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        };
        eprintln!("[{}] {}", prefix, toast.message);
    }
}

async fn wait_or_quit(interval: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(interval) => false,
        _ = tokio::signal::ctrl_c() => true,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let session = session_from_env();
    let api = Arc::new(
        ApiClient::new(&config.api, session.clone()).context("creating API client")?,
    );
    let toasts = Arc::new(ToastQueue::new(config.notifications.capacity));
    let scope = ViewScope::mount();

    match cli.command {
        Command::FlashSales { watch } => {
            let interval = config.polling.flash_sale_interval();
            let board = FlashSaleBoard::new(
                api,
                session,
                scope.handle(),
                toasts.clone(),
                interval,
            );
            if watch {
                board.mount();
                loop {
                    if wait_or_quit(Duration::from_secs(1)).await {
                        break;
                    }
                    print_sales(&board);
                    flush_toasts(&toasts);
                }
            } else {
                board.refresh().await?;
                print_sales(&board);
            }
        }
        Command::Live { watch } => {
            let list = LiveStreamList::new(
                api,
                scope.handle(),
                toasts.clone(),
                config.polling.live_stream_interval(),
                config.virtualization.clone(),
            );
            if watch {
                list.mount();
                loop {
                    if wait_or_quit(Duration::from_secs(1)).await {
                        break;
                    }
                    print_streams(&list);
                    flush_toasts(&toasts);
                }
            } else {
                list.refresh().await?;
                print_streams(&list);
            }
        }
        Command::Like {
            content_id,
            likes,
            liked,
        } => {
            let button = LikeButton::new(
                ReactionTarget::Content(content_id),
                LikeState::new(liked, likes),
                api,
                session,
                scope.handle(),
                toasts.clone(),
            );
            match button.toggle_like().await {
                ActionResult::SignInRequired => {
                    eprintln!("Sign in first: set CREATOR_SYNC_TOKEN");
                }
                ActionResult::Done(MutationOutcome::Committed(state)) => {
                    println!("liked: {}  likes: {}", state.liked, state.likes);
                }
                ActionResult::Done(_) | ActionResult::NotPermitted | ActionResult::Unavailable => {
                    let state = button.state();
                    println!("liked: {}  likes: {}", state.liked, state.likes);
                }
            }
            flush_toasts(&toasts);
        }
    }

    scope.unmount();
    Ok(())
}

fn print_streams(list: &LiveStreamList) {
    for stream in list.streams() {
        println!("{:>8}  {}  ({})", stream.viewer_count, stream.title, stream.creator);
    }
    println!("total viewers: {}", list.total_viewers());
}

fn print_sales(board: &FlashSaleBoard) {
    for sale in board.sales() {
        println!("{:<24} {}", sale.title, sale.stock.label());
    }
}
