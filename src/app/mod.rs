use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::AppConfig, templ_manager::TemplateManager, Result, SheetsClient};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Missing Google settings do not stop the server from starting, they surface
    /// as a failed append on the first signup.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let tm = TemplateManager::init();
        let sheets_client = SheetsClient::new(config.sheets_config)?;
        let app_state = AppState::new(tm, sheets_client);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub templ_mgr: TemplateManager,
    pub sheets_client: SheetsClient,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(templ_mgr: TemplateManager, sheets_client: SheetsClient) -> Self {
        AppState(Arc::new(InternalState {
            templ_mgr,
            sheets_client,
        }))
    }
}
