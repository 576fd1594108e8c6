//! # Selection Commands
//!
//! Each command applies one selection change and returns the refreshed
//! [`FlowView`]: the engine re-applies discounts and reprices on every
//! change, so the view is always current.

use chrono::{DateTime, Utc};
use tracing::debug;
use wayfare_core::{DateRange, FlowView, PaymentMethod};

use crate::error::ApiError;
use crate::state::FlowState;

pub fn toggle_unit(
    flow: &FlowState,
    unit_id: &str,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(unit_id = %unit_id, "toggle_unit command");
    flow.with_flow_mut(|f| {
        f.toggle_unit(unit_id, now)?;
        Ok(f.view(now))
    })
}

/// Adds `delta` (may be negative) to one ticket type's quantity.
pub fn set_quantity(
    flow: &FlowState,
    ticket_id: &str,
    delta: i64,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(ticket_id = %ticket_id, delta, "set_quantity command");
    flow.with_flow_mut(|f| {
        f.set_quantity(ticket_id, delta, now)?;
        Ok(f.view(now))
    })
}

pub fn set_guests(
    flow: &FlowState,
    adults: u32,
    children: u32,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(adults, children, "set_guests command");
    flow.with_flow_mut(|f| {
        f.set_guest_counts(adults, children, now)?;
        Ok(f.view(now))
    })
}

pub fn set_payment_method(
    flow: &FlowState,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(%method, "set_payment_method command");
    flow.with_flow_mut(|f| {
        f.set_payment_method(method, now)?;
        Ok(f.view(now))
    })
}

/// Sets the stay from `YYYY-MM-DD` dates, or clears it when both are absent.
///
/// ## Errors
/// - Only one of the two dates given
/// - Unparseable date, or check-out not after check-in
pub fn set_stay_window(
    flow: &FlowState,
    check_in: Option<&str>,
    check_out: Option<&str>,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(?check_in, ?check_out, "set_stay_window command");
    let window = match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => Some(DateRange::parse_dates(check_in, check_out)?),
        (None, None) => None,
        _ => {
            return Err(ApiError::validation(
                "check_in and check_out must be given together",
            ))
        }
    };

    flow.with_flow_mut(|f| {
        f.set_stay_window(window, now)?;
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

    fn lodging_app(now: DateTime<Utc>) -> AppState {
        let app = AppState::new(ConfigState::default(), CatalogState::demo().unwrap());
        start(&app, BookingKind::Lodging, now).unwrap();
        app
    }

    fn dates(now: DateTime<Utc>, from: i64, to: i64) -> (String, String) {
        let day = |offset: i64| {
            (now.date_naive() + chrono::Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string()
        };
        (day(from), day(to))
    }

    #[test]
    fn test_stay_window_filters_reserved_rooms() {
        let now = Utc::now();
        let app = lodging_app(now);
        // R101 is reserved from day 3 for 2 nights
        let (check_in, check_out) = dates(now, 3, 5);

        let view = set_stay_window(&app.flow, Some(&check_in), Some(&check_out), now).unwrap();
        let ids: Vec<&str> = view.units.items.iter().map(|u| u.id.as_str()).collect();
        assert!(!ids.contains(&"R101"));
        assert_eq!(view.units.total_count, 4);
        assert_eq!(view.units.total_pages, 2);
    }

    #[test]
    fn test_half_given_window_is_rejected() {
        let now = Utc::now();
        let app = lodging_app(now);
        let err = set_stay_window(&app.flow, Some("2030-01-01"), None, now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = set_stay_window(&app.flow, Some("2030-01-05"), Some("2030-01-01"), now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_two_rooms_five_nights_by_card() {
        let now = Utc::now();
        let app = lodging_app(now);
        let (check_in, check_out) = dates(now, 50, 55);

        set_stay_window(&app.flow, Some(&check_in), Some(&check_out), now).unwrap();
        toggle_unit(&app.flow, "R102", now).unwrap();
        let view = toggle_unit(&app.flow, "R202", now).unwrap();

        let applied: Vec<&str> = view
            .discounts
            .iter()
            .filter(|d| d.applied)
            .map(|d| d.code.as_str())
            .collect();
        assert!(applied.contains(&"MULTI_ROOM"));
        assert!(applied.contains(&"LONG_STAY"));
        assert!(!applied.contains(&"CASH_PAY"));
        // (600,000 + 1,100,000) × 5 nights
        assert_eq!(view.price.subtotal.minor(), 8_500_000);
    }

    #[test]
    fn test_unknown_unit_is_not_found() {
        let now = Utc::now();
        let app = lodging_app(now);
        let err = toggle_unit(&app.flow, "R999", now).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
