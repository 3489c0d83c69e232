// Main entry point - Dependency injection and one headless dashboard session
use dashboard_client::domain::collaboration::PresenceUser;
use dashboard_client::infrastructure::config::load_client_config;
use dashboard_client::presentation::app_state::AppState;
use dashboard_client::presentation::dashboard_page::{PageOutcome, open_dashboard, render_layout};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_client_config()?;
    let Some(slug) = config.session.dashboard.clone() else {
        anyhow::bail!("no dashboard configured, set DASHBOARD__SESSION__DASHBOARD");
    };

    let state = AppState::from_config(&config)?;

    // Dashboards visible to this session
    let dashboards = state.dashboard_service.list_dashboards().await;
    match dashboards {
        Ok(list) => tracing::info!("{} dashboards available", list.len()),
        Err(e) => tracing::warn!("Could not list dashboards: {}", e),
    }

    let user = PresenceUser {
        id: std::process::id().to_string(),
        name: whoami(),
        color: None,
    };

    let session = match open_dashboard(&state, &slug, user).await? {
        PageOutcome::Redirect(path) => {
            println!("Sign in required, continue at {}", path);
            return Ok(());
        }
        PageOutcome::Opened(session) => session,
    };

    println!("{}", render_layout(&session.layout().await));

    state.realtime.on_component_updated(|update| {
        tracing::info!("Component {} updated remotely: {}", update.component_id, update.changes);
    });
    state.realtime.on_cursor_moved(|moved| {
        tracing::debug!("{} moved cursor to ({}, {})", moved.user.name, moved.position.x, moved.position.y);
    });

    tokio::signal::ctrl_c().await?;

    println!("{}", render_layout(&session.layout().await));
    session.close();
    state.realtime.disconnect();

    Ok(())
}

fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "viewer".to_string())
}
