//! # State Module
//!
//! Host state, split by concern so every command takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │ ConfigState  │  │  CatalogState    │  │    FlowState     │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  currency    │  │  lodging catalog │  │  Arc<Mutex<      │          │
//! │  │  page_size   │  │  ticketed catalog│  │   Option<        │          │
//! │  │  tax_rate    │  │                  │  │    BookingFlow>>>│          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ConfigState, CatalogState: read-only after initialization           │
//! │  • FlowState: protected by Arc<Mutex<T>> for exclusive access          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod flow;

pub use catalog::CatalogState;
pub use config::ConfigState;
pub use flow::FlowState;

/// Everything the command loop hands to commands.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ConfigState,
    pub catalogs: CatalogState,
    pub flow: FlowState,
}

impl AppState {
    pub fn new(config: ConfigState, catalogs: CatalogState) -> Self {
        AppState {
            config,
            catalogs,
            flow: FlowState::new(),
        }
    }
}
