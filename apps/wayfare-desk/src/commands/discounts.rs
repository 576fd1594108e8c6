//! # Discount and Add-on Commands
//!
//! Manual overrides on top of the auto-applied discounts.
//!
//! ```text
//! toggle_discount(rule)
//!   ├── eligible   → flipped in the applied set (until the next selection change)
//!   └── otherwise  → no-op, view returned unchanged
//!
//! toggle_add_on(id)
//!   └── flips the add-on, reprices; applied discounts are kept
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;
use wayfare_core::FlowView;

use crate::error::ApiError;
use crate::state::FlowState;

pub fn toggle_discount(
    flow: &FlowState,
    rule_id: &str,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(rule_id = %rule_id, "toggle_discount command");
    flow.with_flow_mut(|f| {
        f.toggle_discount(rule_id, now);
        Ok(f.view(now))
    })
}

pub fn toggle_add_on(
    flow: &FlowState,
    add_on_id: &str,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(add_on_id = %add_on_id, "toggle_add_on command");
    flow.with_flow_mut(|f| {
        f.toggle_add_on(add_on_id)?;
        Ok(f.view(now))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::flow::start;
    use crate::error::ErrorCode;
    use crate::state::{AppState, CatalogState, ConfigState};
    use wayfare_core::BookingKind;

    fn ticketed_app(now: DateTime<Utc>) -> AppState {
        let app = AppState::new(ConfigState::default(), CatalogState::demo().unwrap());
        start(&app, BookingKind::Ticketed, now).unwrap();
        app
    }

    fn applied(view: &FlowView, code: &str) -> bool {
        view.discounts.iter().any(|d| d.code == code && d.applied)
    }

    #[test]
    fn test_toggle_eligible_discount_off_and_on() {
        let now = Utc::now();
        let app = ticketed_app(now);

        let view = toggle_discount(&app.flow, "WALLET", now).unwrap();
        assert!(!applied(&view, "WALLET"));
        let view = toggle_discount(&app.flow, "WALLET", now).unwrap();
        assert!(applied(&view, "WALLET"));
    }

    #[test]
    fn test_toggle_ineligible_or_unknown_is_noop() {
        let now = Utc::now();
        let app = ticketed_app(now);
        let before = app.flow.with_flow(|f| Ok(f.view(now))).unwrap();

        let after = toggle_discount(&app.flow, "GROUP8", now).unwrap();
        assert_eq!(after, before);
        let after = toggle_discount(&app.flow, "NOPE", now).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_add_ons_start_selected_and_toggle() {
        let now = Utc::now();
        let app = ticketed_app(now);
        let before = app.flow.with_flow(|f| Ok(f.view(now))).unwrap();
        assert!(before.add_ons.iter().all(|a| a.selected));
        assert_eq!(before.price.subtotal.minor(), 450_000);

        let view = toggle_add_on(&app.flow, "lunch", now).unwrap();
        assert_eq!(view.price.subtotal.minor(), 300_000);

        let err = toggle_add_on(&app.flow, "spa", now).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
