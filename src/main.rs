use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agora::app::auth::TokenVerifier;
use agora::app::engagement::EngagementFacade;
use agora::app::feed::FeedWindows;
use agora::app::notifications::NotificationOutbox;
use agora::config::AppConfig;
use agora::infra::{
    cache::RedisCache, db::Db, notification_sink::PgNotificationSink,
    pg_store::PgEngagementStore,
};
use agora::{http, jobs, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let db = Db::connect(&config.database).await?;
    if config.run_migrations {
        let known = db.run_migrations(&config.migrations_dir).await?;
        tracing::info!(migrations = known, "schema up to date");
    }

    let cache = match &config.redis_url {
        Some(url) => Some(RedisCache::connect(url).await?),
        None => None,
    };

    let (outbox, receiver) = NotificationOutbox::channel(config.notification_queue_capacity);
    let sink = Arc::new(PgNotificationSink::new(db.clone()));
    let dispatcher = tokio::spawn(jobs::notification_dispatcher::run(receiver, sink));

    let store = Arc::new(PgEngagementStore::new(db));
    let windows = FeedWindows::with_trending_days(config.trending_window_days);
    let mut engagement = EngagementFacade::new(store, outbox, windows);
    if let Some(cache) = &cache {
        engagement =
            engagement.with_feed_cache(Arc::new(cache.clone()), config.feed_cache_ttl_seconds);
    }

    let state = AppState {
        engagement,
        tokens: TokenVerifier::new(config.paseto_access_key),
        cache,
        admin_token: config.admin_token.clone(),
    };

    let app: Router = http::router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last outbox senders; the dispatcher drains what is
    // left and exits.
    if let Err(err) = dispatcher.await {
        tracing::error!(error = %err, "notification dispatcher panicked");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
