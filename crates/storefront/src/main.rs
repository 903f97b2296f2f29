//! Storecart storefront binary.
//!
//! Serves the cart API and checkout hand-off. Carts live in the shopper's
//! session; Shopify is only asked for variant IDs and hosted checkouts.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use storecart_storefront::config::StorefrontConfig;
use storecart_storefront::state::AppState;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "storecart_storefront=info,storecart_core=info,tower_http=debug";

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Sentry has to be up before the subscriber so its layer has a client.
    let _sentry = init_sentry(&config);
    init_tracing();

    tracing::info!(
        store = %config.shopify.store,
        api_version = %config.shopify.api_version,
        tax_rate = %config.pricing.tax_rate,
        free_shipping_threshold = %config.pricing.free_shipping_threshold,
        "Configuration loaded"
    );

    let addr = config.socket_addr();
    let app = storecart_storefront::app(AppState::new(config))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        attach_stacktrace: true,
        ..Default::default()
    };

    Some(sentry::init((dsn, options)))
}

/// `RUST_LOG` wins over the default filter; `STOREFRONT_LOG_FORMAT=json`
/// switches to one JSON object per line. Warnings and errors become Sentry
/// events; info and debug become breadcrumbs.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("STOREFRONT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let sentry_layer = sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        Level::ERROR | Level::WARN => EventFilter::Event,
        Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
        Level::TRACE => EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(sentry_layer)
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutting down");
}
