//! # Browse Commands
//!
//! Room type filter and paging over the availability results.

use chrono::{DateTime, Utc};
use tracing::debug;
use wayfare_core::{FlowView, UnitTypeFilter};

use crate::error::ApiError;
use crate::state::FlowState;

/// Maps the wire value to a filter; absent, empty and "any" match all types.
pub fn parse_unit_type(unit_type: Option<&str>) -> UnitTypeFilter {
    match unit_type.map(str::trim) {
        None | Some("") => UnitTypeFilter::Any,
        Some(t) if t.eq_ignore_ascii_case("any") => UnitTypeFilter::Any,
        Some(t) => UnitTypeFilter::Only(t.to_string()),
    }
}

/// Applies the type filter, then moves to `page` if one was requested.
///
/// A changed filter always lands on page 1 first; the requested page is
/// then clamped against the new result count.
pub fn search(
    flow: &FlowState,
    unit_type: Option<String>,
    page: Option<usize>,
    now: DateTime<Utc>,
) -> Result<FlowView, ApiError> {
    debug!(?unit_type, ?page, "search command");
    let filter = parse_unit_type(unit_type.as_deref());
    flow.with_flow_mut(|f| {
        f.set_unit_type(filter);
        if let Some(page) = page {
            f.go_to_page(page);
        }
        Ok(f.view(now))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::flow::start;
    use crate::state::{AppState, CatalogState, ConfigState};
    use wayfare_core::BookingKind;

    #[test]
    fn test_parse_unit_type() {
        assert_eq!(parse_unit_type(None), UnitTypeFilter::Any);
        assert_eq!(parse_unit_type(Some(" ")), UnitTypeFilter::Any);
        assert_eq!(parse_unit_type(Some("ANY")), UnitTypeFilter::Any);
        assert_eq!(
            parse_unit_type(Some("Suite")),
            UnitTypeFilter::Only("Suite".to_string())
        );
    }

    #[test]
    fn test_search_pages_and_filters() {
        let now = Utc::now();
        let app = AppState::new(ConfigState::default(), CatalogState::demo().unwrap());
        start(&app, BookingKind::Lodging, now).unwrap();

        // 5 open rooms, 3 per page
        let view = search(&app.flow, None, Some(2), now).unwrap();
        assert_eq!(view.units.page, 2);
        assert_eq!(view.units.items.len(), 2);

        let view = search(&app.flow, Some("Deluxe".to_string()), Some(9), now).unwrap();
        assert_eq!(view.units.page, 1);
        assert_eq!(view.units.total_count, 2);

        let view = search(&app.flow, Some("Igloo".to_string()), None, now).unwrap();
        assert!(view.units.no_matches);
    }
}
