//! # Flow Commands
//!
//! Opening, rendering, confirming and cancelling a booking.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Idle    │────►│ Selecting│────►│ Confirm  │────►│ Payload  │       │
//! │  │          │     │          │     │          │     │ handed   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     │ off      │       │
//! │        ▲        start    │  selection.rs            └──────────┘       │
//! │        │                 │  browse.rs                                   │
//! │        │                 │  discounts.rs                                │
//! │        │                 ▼                                              │
//! │        └────────────── cancel                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use wayfare_core::{BookingFlow, BookingKind, BookingPayload, FlowView};

use crate::error::ApiError;
use crate::state::{AppState, FlowState};

/// Result of a cancel command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    /// False when no booking was in progress.
    pub cancelled: bool,
}

/// Opens a booking flow on the catalog of `kind`, replacing any open one.
pub fn start(app: &AppState, kind: BookingKind, now: DateTime<Utc>) -> Result<FlowView, ApiError> {
    let catalog = app.catalogs.get(kind).clone();
    let flow = BookingFlow::start(catalog, app.config.flow_settings(), now)?;
    let view = flow.view(now);

    if app.flow.is_active() {
        info!("Replacing unfinished booking");
    }
    app.flow.begin(flow);
    Ok(view)
}

/// Current units page, annotated discounts and price.
pub fn view(flow: &FlowState, now: DateTime<Utc>) -> Result<FlowView, ApiError> {
    flow.with_flow(|f| Ok(f.view(now)))
}

/// Finalizes the booking. The flow ends only when confirmation succeeds.
pub fn confirm(app: &AppState, now: DateTime<Utc>) -> Result<BookingPayload, ApiError> {
    let payload = app.flow.complete_with(|f| Ok(f.confirm(now)?))?;
    info!(
        reference = %payload.reference,
        total = %app.config.format_money(payload.final_total),
        "Booking handed off for submission"
    );
    Ok(payload)
}

pub fn cancel(flow: &FlowState) -> CancelResponse {
    let cancelled = flow.end();
    if cancelled {
        info!("Booking cancelled");
    }
    CancelResponse { cancelled }
}
