// Dashboard page - Protected entry point for viewing and editing one dashboard
use crate::application::auth_gate::GateDecision;
use crate::application::collaboration_service::CollaborationSession;
use crate::domain::catalog::component_type_info;
use crate::domain::collaboration::PresenceUser;
use crate::domain::layout::GridLayout;
use crate::presentation::app_state::AppState;
use std::fmt::Write;

pub enum PageOutcome {
    /// Not signed in; navigate here instead.
    Redirect(String),
    Opened(CollaborationSession),
}

/// Run the auth gate, then load the dashboard and join its realtime room.
pub async fn open_dashboard(state: &AppState, slug: &str, user: PresenceUser) -> anyhow::Result<PageOutcome> {
    match state.auth_gate.wait(&state.session).await {
        GateDecision::Allow => {}
        GateDecision::Redirect(path) => {
            tracing::info!("Not signed in, redirecting to {}", path);
            return Ok(PageOutcome::Redirect(path));
        }
        GateDecision::Pending => anyhow::bail!("session provider closed before loading"),
    }

    let session = CollaborationSession::open(
        state.realtime.clone(),
        state.dashboard_service.clone(),
        slug,
        user,
    )
    .await?;
    Ok(PageOutcome::Opened(session))
}

/// Plain-text rendering of the grid, top-to-bottom then left-to-right.
pub fn render_layout(layout: &GridLayout) -> String {
    let dashboard = layout.dashboard();
    let mut out = format!("{} ({} components)\n", dashboard.title, dashboard.components.len());

    let mut components: Vec<_> = layout.components().iter().collect();
    components.sort_by_key(|c| (c.position.y, c.position.x));

    for c in components {
        let (icon, label) = component_type_info(c.component_type)
            .map(|info| (info.icon, info.label))
            .unwrap_or(("?", "Unknown"));
        let p = &c.position;
        let _ = writeln!(
            out,
            "  [{icon}] {} <{label}> at ({}, {}) size {}x{}{}",
            c.title,
            p.x,
            p.y,
            p.w,
            p.h,
            if p.is_static { " static" } else { "" }
        );
    }
    out
}
