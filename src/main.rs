// SPDX-License-Identifier: MPL-2.0

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use vistagram::api::{ApiClient, ClientError, NewUser, SocialApi, Upload};
use vistagram::runtime;
use vistagram::state::{SessionError, SessionManager, Settings};
use vistagram::sync::{
    FeedView, HashtagState, HashtagView, MessagesView, NotificationsView, OptimisticToggle,
    ProfileState, ProfileView, SearchController, StoryTray, UnreadPoller, badge_label,
    publish_post, publish_story, trending_hashtags,
};
use vistagram::text::{Segment, split_hashtags};

#[derive(Parser)]
#[command(name = "vistagram")]
#[command(about = "Command-line client for Vistagram")]
struct Cli {
    /// Override the API base URL from settings
    #[arg(long)]
    api: Option<url::Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        username: String,
        /// Password (falls back to VISTAGRAM_PASSWORD)
        #[arg(long, env = "VISTAGRAM_PASSWORD")]
        password: String,
    },

    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        full_name: String,
        #[arg(long, env = "VISTAGRAM_PASSWORD")]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Show a profile, optionally toggling follow
    Profile {
        username: String,
        #[arg(long)]
        toggle_follow: bool,
    },

    /// Show the home feed
    Feed {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Publish a post with an image
    Post {
        path: PathBuf,
        #[arg(long, default_value = "")]
        caption: String,
    },

    /// Publish a story with an image
    Story {
        path: PathBuf,
        /// Text overlay
        #[arg(long, default_value = "")]
        text: String,
    },

    /// Like or unlike a post from the first feed page
    Like { post_id: i64 },

    /// Show posts for a hashtag, or trending tags when no name is given
    Hashtag { name: Option<String> },

    /// List story groups
    Stories {
        /// Only this user's stories
        #[arg(long)]
        user: Option<String>,
    },

    /// List conversations, optionally showing one thread
    Inbox {
        #[arg(long, short = 'c')]
        conversation: Option<i64>,
    },

    /// Send a text message to a user
    Send { user_id: i64, content: String },

    /// Send an image to a user
    SendImage { user_id: i64, path: PathBuf },

    /// List notifications
    Notifications {
        /// Mark every notification as read
        #[arg(long)]
        mark_all: bool,
    },

    /// Search users
    Search { query: String },

    /// Print the unread badge whenever it changes
    Watch,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();
    if let Some(api) = cli.api {
        settings.api_base_url = api;
    }

    let client = match ApiClient::with_base_url(settings.api_base_url.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Failed to create client: {e}");
            std::process::exit(1);
        }
    };

    let sessions = match SessionManager::new() {
        Ok(sessions) => sessions,
        Err(e) => {
            eprintln!("Failed to locate session storage: {e}");
            std::process::exit(1);
        }
    };
    match sessions.load() {
        Ok(session) => client.resume_session(&session),
        Err(SessionError::NotFound) => {}
        Err(e) => tracing::warn!("ignoring stored session: {e}"),
    }

    if let Err(e) = runtime::block_on(run(cli.command, client, &sessions, &settings)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    client: Arc<ApiClient>,
    sessions: &SessionManager,
    settings: &Settings,
) -> Result<(), ClientError> {
    let api: Arc<dyn SocialApi> = client.clone();

    match command {
        Commands::Login { username, password } => {
            let session = client.login(&username, &password).await?;
            if let Err(e) = sessions.store(&session) {
                eprintln!("Logged in, but the session could not be saved: {e}");
            }
            println!("Logged in as {}", session.username);
        }
        Commands::Register {
            username,
            email,
            full_name,
            password,
        } => {
            let user = client
                .register(&NewUser {
                    username: &username,
                    email: &email,
                    full_name: &full_name,
                    password: &password,
                    bio: "",
                })
                .await?;
            println!("Registered @{} (id {})", user.username, user.id);
        }
        Commands::Logout => {
            client.clear_session();
            if let Err(e) = sessions.clear() {
                eprintln!("Failed to remove session: {e}");
            }
            println!("Logged out");
        }
        Commands::Whoami => {
            if !client.is_authenticated() {
                return Err(ClientError::NotAuthenticated);
            }
            let user = client.current_user().await?;
            println!("@{} on {}", user.username, client.base_url());
        }
        Commands::Profile {
            username,
            toggle_follow,
        } => {
            let mut view = ProfileView::new(api, &username);
            view.load().await;
            let (ProfileState::Ready, Some(profile)) = (view.state(), view.profile()) else {
                println!("@{} not found", view.username());
                return Ok(());
            };
            println!(
                "@{} {}\n{} posts, {} followers, {} following",
                profile.user.username,
                profile.user.full_name,
                profile.posts_count,
                profile.followers_count,
                profile.following_count
            );
            if let Some(bio) = &profile.user.bio {
                println!("{bio}");
            }

            if toggle_follow {
                if let Some(handle) = view.toggle_follow() {
                    if let Some(value) = view.follow_state() {
                        println!(
                            "{} @{} ({} followers)",
                            if value.active { "Following" } else { "Unfollowed" },
                            view.username(),
                            value.count
                        );
                    }
                    finish(handle).await;
                }
            }
        }
        Commands::Post { path, caption } => {
            let post = publish_post(api.as_ref(), upload_from(&path)?, &caption).await?;
            println!("Posted [{}]", post.id);
        }
        Commands::Story { path, text } => {
            let story = publish_story(api.as_ref(), upload_from(&path)?, &text).await?;
            println!("Story [{}] is live", story.id);
        }
        Commands::Feed { pages } => {
            let mut feed = FeedView::with_page_size(api, settings.page_size);
            feed.load().await;
            for _ in 1..pages {
                if !feed.has_more() {
                    break;
                }
                feed.load_more().await;
            }
            for post in feed.posts() {
                let likes = if post.is_liked { "♥" } else { "♡" };
                println!(
                    "[{}] @{} {likes} {}",
                    post.id, post.author.username, post.likes_count
                );
                if let Some(caption) = &post.caption {
                    println!("    {caption}");
                    let routes = hashtag_routes(caption);
                    if !routes.is_empty() {
                        println!("    {}", routes.join(" "));
                    }
                }
                for path in post.image_paths() {
                    if let Some(url) = settings.media_url(path) {
                        println!("    {url}");
                    }
                }
            }
        }
        Commands::Like { post_id } => {
            let mut feed = FeedView::with_page_size(api.clone(), settings.page_size);
            feed.load().await;
            let Some(post) = feed.posts().iter().find(|p| p.id == post_id) else {
                return Err(ClientError::NotFound);
            };

            let toggle = OptimisticToggle::for_post(api, post);
            let handle = toggle.toggle();
            let value = toggle.value();
            println!(
                "{} post {post_id} ({} likes)",
                if value.active { "Liked" } else { "Unliked" },
                value.count
            );
            finish(handle).await;
        }
        Commands::Hashtag { name: None } => {
            for tag in trending_hashtags(api.as_ref()).await {
                println!("#{} ({} posts)", tag.name, tag.posts_count);
            }
        }
        Commands::Hashtag { name: Some(name) } => {
            let mut view = HashtagView::with_page_size(api, &name, settings.page_size);
            view.load().await;
            match view.state() {
                HashtagState::NotFound => println!("#{} not found", view.name()),
                _ => {
                    if let Some(tag) = view.hashtag() {
                        println!("#{} ({} posts)", tag.name, tag.posts_count);
                    }
                    for post in view.posts() {
                        println!("[{}] @{}", post.id, post.author.username);
                    }
                }
            }
        }
        Commands::Stories { user } => {
            let mut tray = StoryTray::new(api);
            match user {
                Some(username) => tray.load_for_user(&username).await,
                None => tray.load().await,
            }
            for group in tray.groups() {
                let marker = if group.has_unviewed { "*" } else { " " };
                println!(
                    "{marker} @{} ({} stories)",
                    group.user.username,
                    group.stories.len()
                );
            }
        }
        Commands::Inbox { conversation } => {
            let mut inbox = MessagesView::new(api);
            inbox.open(conversation).await;
            for c in inbox.conversations() {
                let preview = c.last_message.as_ref().map(|m| m.preview()).unwrap_or_default();
                let unread = if c.unread_count > 0 {
                    format!(" ({})", c.unread_count)
                } else {
                    String::new()
                };
                println!("[{}] @{}{unread}: {preview}", c.id, c.other_user.username);
            }
            if inbox.selected().is_some() {
                println!("--- {}", inbox.route());
                for message in inbox.thread() {
                    println!("@{}: {}", message.sender.username, message.preview());
                }
            }
        }
        Commands::Send { user_id, content } => {
            let mut inbox = MessagesView::new(api);
            inbox.start_with(user_id).await?;
            inbox.send_text(&content).await?;
            println!("Sent");
        }
        Commands::SendImage { user_id, path } => {
            let upload = upload_from(&path)?;
            let mut inbox = MessagesView::new(api);
            inbox.start_with(user_id).await?;
            inbox.send_image(upload).await?;
            println!("Sent");
        }
        Commands::Notifications { mark_all } => {
            let mut view = NotificationsView::new(api);
            view.load().await;
            if mark_all {
                finish(view.mark_all_read()).await;
            }
            for n in view.items() {
                let marker = if n.is_read { " " } else { "*" };
                let route = n.route().unwrap_or_default();
                println!("{marker} {} {route}", n.message);
            }
        }
        Commands::Search { query } => {
            let mut search =
                SearchController::new(api).with_quiet_period(settings.search_debounce());
            search.submit(&query).await;
            let state = search.state();
            if state.results.is_empty() {
                println!("No users found");
            }
            for user in &state.results {
                println!("@{} {}", user.username, user.full_name);
            }
        }
        Commands::Watch => {
            let handle = UnreadPoller::start(api, settings.unread_poll_interval());
            let mut rx = handle.subscribe();
            while rx.changed().await.is_ok() {
                let count = *rx.borrow_and_update();
                println!("{}", badge_label(count).unwrap_or_else(|| "-".to_string()));
            }
        }
    }

    Ok(())
}

fn hashtag_routes(caption: &str) -> Vec<String> {
    split_hashtags(caption)
        .iter()
        .filter_map(Segment::route)
        .collect()
}

async fn finish(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        tracing::warn!("background request did not complete: {e}");
    }
}

fn upload_from(path: &Path) -> Result<Upload, ClientError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ClientError::Validation(format!("cannot read image: {e}")))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(Upload {
        mime: mime_for(path).to_string(),
        bytes,
        file_name,
    })
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
