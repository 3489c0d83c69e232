// Application state - Every collaborator a page needs, built once at startup
use crate::application::auth_gate::AuthGate;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::api_client::{ApiClient, RequestOptions};
use crate::infrastructure::api_repository::ApiDashboardRepository;
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::http_transport::ReqwestTransport;
use crate::infrastructure::realtime::RealtimeClient;
use crate::infrastructure::realtime_transport::WebSocketTransport;
use crate::infrastructure::session::WatchSessionProvider;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub realtime: Arc<RealtimeClient>,
    pub auth_gate: AuthGate,
    pub session: WatchSessionProvider,
}

impl AppState {
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let client = ApiClient::new(transport, config.api.base_url.clone())
            .with_session_cookie(config.api.session_cookie.clone());
        let options = RequestOptions {
            credential: config.auth.credential.clone(),
        };
        let repository = Arc::new(ApiDashboardRepository::new(client, options));

        let realtime_transport = WebSocketTransport::new(config.realtime.url.clone())
            .with_session_cookie(config.api.session_cookie.clone())
            .with_credential(config.auth.credential.clone());

        Ok(Self {
            dashboard_service: DashboardService::new(repository),
            realtime: Arc::new(RealtimeClient::new(Arc::new(realtime_transport))),
            auth_gate: AuthGate::new(config.auth.sign_in_path.clone()),
            session: WatchSessionProvider::from_credential(config.auth.credential.as_deref()),
        })
    }
}
