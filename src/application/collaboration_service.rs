// Collaboration session - Keeping one open dashboard in sync with other viewers
use crate::application::dashboard_service::DashboardService;
use crate::domain::collaboration::{ComponentUpdated, CursorPosition, PresenceUser};
use crate::domain::component::{Component, GridPosition};
use crate::domain::layout::GridLayout;
use crate::infrastructure::realtime::{ListenerId, RealtimeClient};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

pub struct CollaborationSession {
    realtime: Arc<RealtimeClient>,
    service: DashboardService,
    layout: Arc<Mutex<GridLayout>>,
    slug: String,
    user: PresenceUser,
    listener: ListenerId,
    applier: JoinHandle<()>,
}

impl CollaborationSession {
    /// Load `slug`, join its realtime room and start applying edits made by
    /// other viewers. Edits tagged with `user.id` are our own echoes and are
    /// skipped.
    pub async fn open(
        realtime: Arc<RealtimeClient>,
        service: DashboardService,
        slug: &str,
        user: PresenceUser,
    ) -> anyhow::Result<Self> {
        let layout = Arc::new(Mutex::new(service.load(slug).await?));

        realtime.connect();
        realtime.join_dashboard(slug);

        let (tx, rx) = mpsc::unbounded_channel();
        let listener = realtime.on_component_updated(move |update| {
            let _ = tx.send(update);
        });
        let applier = tokio::spawn(apply_remote_updates(rx, layout.clone(), user.id.clone()));

        tracing::info!("Joined dashboard {} as {}", slug, user.name);
        Ok(Self {
            realtime,
            service,
            layout,
            slug: slug.to_string(),
            user,
            listener,
            applier,
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Snapshot of the current grid.
    pub async fn layout(&self) -> GridLayout {
        self.layout.lock().await.clone()
    }

    // Edits run on a snapshot without the lock held; only the returned
    // component is merged back into the shared layout.
    pub async fn move_component(&self, component_id: &str, target: GridPosition) -> anyhow::Result<Component> {
        let mut snapshot = self.layout().await;
        let updated = self
            .service
            .move_component(&mut snapshot, component_id, target)
            .await?;
        self.layout.lock().await.upsert(updated.clone());
        self.broadcast(component_id, json!({ "position": updated.position }));
        Ok(updated)
    }

    pub async fn rename_component(&self, component_id: &str, title: &str) -> anyhow::Result<Component> {
        let mut snapshot = self.layout().await;
        let updated = self
            .service
            .rename_component(&mut snapshot, component_id, title)
            .await?;
        self.layout.lock().await.upsert(updated.clone());
        self.broadcast(component_id, json!({ "title": updated.title }));
        Ok(updated)
    }

    pub async fn update_config(&self, component_id: &str, config: Value) -> anyhow::Result<Component> {
        let mut snapshot = self.layout().await;
        let updated = self
            .service
            .update_config(&mut snapshot, component_id, config)
            .await?;
        self.layout.lock().await.upsert(updated.clone());
        self.broadcast(component_id, json!({ "config": updated.config }));
        Ok(updated)
    }

    pub fn move_cursor(&self, position: CursorPosition) {
        self.realtime
            .emit_cursor_move(&self.slug, position, self.user.clone());
    }

    fn broadcast(&self, component_id: &str, changes: Value) {
        self.realtime
            .emit_component_update_as(&self.slug, component_id, changes, &self.user.id);
    }

    /// Leave the room. The realtime connection itself stays up for other
    /// sessions.
    pub fn close(self) {
        self.realtime.leave_dashboard(&self.slug);
        self.realtime.remove_listener(&self.listener);
        self.applier.abort();
        tracing::info!("Left dashboard {}", self.slug);
    }
}

async fn apply_remote_updates(
    mut rx: mpsc::UnboundedReceiver<ComponentUpdated>,
    layout: Arc<Mutex<GridLayout>>,
    own_user_id: String,
) {
    while let Some(update) = rx.recv().await {
        if update.user_id.as_deref() == Some(own_user_id.as_str()) {
            continue;
        }
        if !layout.lock().await.apply_remote(&update) {
            tracing::debug!("Remote update for unknown component {}", update.component_id);
        }
    }
}
