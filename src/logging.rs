use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "siteadmin_backend=debug,tower_http=debug,info",
        Environment::Staging => "siteadmin_backend=debug,tower_http=info,info",
        Environment::Prod => "siteadmin_backend=info,tower_http=info,warn",
    }
}

/// Install the global subscriber: JSON lines in production, pretty output
/// everywhere else.
pub fn init_logging(env: &Environment) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    if env.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json().flatten_event(true))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .try_init()?;
    }

    tracing::info!(environment = ?env, "Logging initialized");
    Ok(())
}
