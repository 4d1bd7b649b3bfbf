use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use rustls::crypto::ring::default_provider;

use cadence_api::types::{Comment, CommentProcess, Post, PostProcess, ReactionProcess};
use cadence_api::{ApiClient, ResourceClient, ResourceRoutes, routes};
use cadence_core::Context;
use cadence_live::{Action, LiveChannel};
use cadence_store::{CreatePolicy, Fetch, LiveEvent, Paginator, Record, Reconciler};

/// How often the leading pages are refreshed when no live channel is up.
const POLL_INTERVAL: Duration = Duration::from_secs(30);

type Store<T> = Arc<Paginator<T, ResourceClient<T>>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let api_url = env::var("CADENCE_API_URL")?;
    let ws_url = env::var("CADENCE_WS_URL")?;

    // A single shared HTTP client behind every resource store
    let api = Arc::new(ApiClient::new(api_url));
    let ctx = Context::new(Arc::clone(&api));

    // One independent controller per list-backed resource
    let posts = mount::<Post>(&ctx, routes::POSTS).await;
    let post_processes = mount::<PostProcess>(&ctx, routes::POST_PROCESSES).await;
    let comment_processes = mount::<CommentProcess>(&ctx, routes::COMMENT_PROCESSES).await;
    let reaction_processes = mount::<ReactionProcess>(&ctx, routes::REACTION_PROCESSES).await;
    let comments = mount::<Comment>(&ctx, routes::COMMENTS).await;

    log_mounted("posts", &posts).await;
    log_mounted("post_processes", &post_processes).await;
    log_mounted("comment_processes", &comment_processes).await;
    log_mounted("reaction_processes", &reaction_processes).await;
    log_mounted("comments", &comments).await;

    // New posts carry their id, so the posts store can prepend the single
    // record; process creations just refresh the leading page.
    let posts_reconciler = Reconciler::new(Arc::clone(&posts), CreatePolicy::PrependRecord);
    let process_reconciler = Reconciler::new(
        Arc::clone(&post_processes),
        CreatePolicy::RefreshLeadingPage,
    );

    let channel = match LiveChannel::connect(&ws_url).await {
        Ok(channel) => channel,
        Err(err) => {
            warn!(%err, "live channel unavailable; polling leading pages instead");
            return poll_only(
                posts,
                post_processes,
                comment_processes,
                reaction_processes,
                comments,
            )
            .await;
        }
    };

    let mut frames = channel.subscribe();
    info!("cadence is watching for live updates");

    loop {
        let frame = match frames.recv().await {
            Ok(frame) => frame,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "dropped live frames; windows heal on next fetch");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        debug!(?frame, "live frame received");

        match frame.action {
            Action::PostCreate => {
                posts_reconciler
                    .apply(LiveEvent::Created {
                        id: frame.record_id(),
                    })
                    .await;
            }
            Action::PostUpdate => match frame.record_id() {
                Some(id) => posts_reconciler.apply(LiveEvent::Updated { id }).await,
                None => warn!("post.update frame without a record id"),
            },
            Action::PostProcessCreate => {
                process_reconciler
                    .apply(LiveEvent::Created {
                        id: frame.record_id(),
                    })
                    .await;
            }
        }
    }

    Ok(())
}

/// Mount one resource store and fetch its first page eagerly.
async fn mount<T>(ctx: &Context, routes: ResourceRoutes) -> Store<T>
where
    T: Record + DeserializeOwned,
{
    let paginator = Arc::new(Paginator::new(ResourceClient::new(
        Arc::clone(&ctx.api),
        routes,
    )));

    // A failed initial fetch leaves an empty window; the controller already
    // logged it, and the next navigation retries.
    let _ = paginator.fetch_page(1).await;

    paginator
}

async fn log_mounted<T, F>(name: &str, paginator: &Paginator<T, F>)
where
    T: Record,
    F: Fetch<T>,
{
    let view = paginator.snapshot().await;
    info!(
        name,
        total = view.total_count,
        pages = view.total_pages,
        "resource mounted"
    );
}

/// Degraded mode without a push channel: keep the leading pages fresh.
async fn poll_only(
    posts: Store<Post>,
    post_processes: Store<PostProcess>,
    comment_processes: Store<CommentProcess>,
    reaction_processes: Store<ReactionProcess>,
    comments: Store<Comment>,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    // The first tick completes immediately; the mounts just fetched.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        debug!("refreshing leading pages");
        refresh_leading(&posts).await;
        refresh_leading(&post_processes).await;
        refresh_leading(&comment_processes).await;
        refresh_leading(&reaction_processes).await;
        refresh_leading(&comments).await;
    }
}

async fn refresh_leading<T, F>(paginator: &Paginator<T, F>)
where
    T: Record,
    F: Fetch<T>,
{
    let limit = paginator.snapshot().await.limit;
    let _ = paginator.fetch_page_with(1, limit, false).await;
}
