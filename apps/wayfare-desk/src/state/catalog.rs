//! # Catalog State
//!
//! The inventory catalogs booking flows run against, one per booking kind.
//!
//! ## Sources
//! ```text
//! WAYFARE_CATALOG_PATH set?
//!   ├── yes → read file → [CatalogSource, ...] → validate → replace per kind
//!   └── no  → built-in demo catalogs
//! ```
//!
//! Read-only after startup, so no mutex.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;
use wayfare_core::{
    AddOnService, BookingKind, CatalogSource, DateRange, InventoryCatalog, InventoryUnit, Money,
    TicketAudience, TicketType,
};

use super::ConfigState;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CatalogState {
    lodging: InventoryCatalog,
    ticketed: InventoryCatalog,
}

impl CatalogState {
    pub fn new(lodging: InventoryCatalog, ticketed: InventoryCatalog) -> Self {
        CatalogState { lodging, ticketed }
    }

    /// Loads the configured catalogs, falling back to the demo data.
    pub fn load(config: &ConfigState) -> Result<Self, ApiError> {
        let mut state = CatalogState::demo()?;
        if let Some(path) = &config.catalog_path {
            state.merge_file(path)?;
        }
        Ok(state)
    }

    /// Replaces catalogs with the ones in a JSON file.
    ///
    /// The file holds an array of catalog sources; kinds it does not
    /// mention keep their current catalog.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ApiError> {
        let raw = fs::read_to_string(path)?;
        let sources: Vec<CatalogSource> = serde_json::from_str(&raw)
            .map_err(|e| ApiError::validation(format!("Catalog file {}: {}", path.display(), e)))?;

        for source in sources {
            let catalog = InventoryCatalog::try_from(source)?;
            info!(
                path = %path.display(),
                kind = ?catalog.kind(),
                units = catalog.units().len(),
                tickets = catalog.tickets().len(),
                "Catalog loaded from file"
            );
            self.replace(catalog);
        }
        Ok(())
    }

    pub fn replace(&mut self, catalog: InventoryCatalog) {
        match catalog.kind() {
            BookingKind::Lodging => self.lodging = catalog,
            BookingKind::Ticketed => self.ticketed = catalog,
        }
    }

    pub fn get(&self, kind: BookingKind) -> &InventoryCatalog {
        match kind {
            BookingKind::Lodging => &self.lodging,
            BookingKind::Ticketed => &self.ticketed,
        }
    }

    /// Built-in demo inventory: a small hotel and a day tour.
    pub fn demo() -> Result<Self, ApiError> {
        Ok(CatalogState::new(demo_lodging()?, demo_ticketed()?))
    }
}

// =============================================================================
// Demo Data
// =============================================================================

fn demo_room(
    id: &str,
    name: &str,
    unit_type: &str,
    capacity: u32,
    nightly: i64,
    reservations: Vec<DateRange>,
) -> InventoryUnit {
    InventoryUnit {
        id: id.to_string(),
        name: name.to_string(),
        unit_type: unit_type.to_string(),
        capacity,
        nightly_price: Money::from_minor(nightly),
        available: true,
        reservations,
    }
}

/// A reservation `offset` days from today lasting `nights` nights.
fn booked(today: NaiveDate, offset: i64, nights: i64) -> Result<DateRange, ApiError> {
    let start = today + Duration::days(offset);
    Ok(DateRange::from_dates(start, start + Duration::days(nights))?)
}

fn demo_lodging() -> Result<InventoryCatalog, ApiError> {
    let today = Utc::now().date_naive();
    let mut closed = demo_room("R302", "Penthouse Suite", "Suite", 6, 3_500_000, Vec::new());
    closed.available = false;

    let units = vec![
        demo_room("R101", "Garden Standard", "Standard", 2, 650_000, vec![booked(today, 3, 2)?]),
        demo_room("R102", "Courtyard Standard", "Standard", 2, 600_000, Vec::new()),
        demo_room("R201", "Deluxe Ocean View", "Deluxe", 3, 1_200_000, vec![booked(today, 10, 4)?]),
        demo_room("R202", "Deluxe Twin", "Deluxe", 4, 1_100_000, Vec::new()),
        demo_room("R301", "Family Suite", "Suite", 5, 2_400_000, vec![booked(today, 35, 7)?]),
        closed,
    ];
    Ok(InventoryCatalog::lodging(units)?)
}

fn demo_ticketed() -> Result<InventoryCatalog, ApiError> {
    let ticket = |id: &str, name: &str, price: i64, audience: TicketAudience| TicketType {
        id: id.to_string(),
        name: name.to_string(),
        unit_price: Money::from_minor(price),
        quantity: 0,
        audience,
    };
    let add_on = |id: &str, name: &str, price: i64| AddOnService {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_minor(price),
    };

    Ok(InventoryCatalog::ticketed(
        vec![
            ticket("adult", "Adult", 450_000, TicketAudience::Adult),
            ticket("child", "Child (4-11)", 250_000, TicketAudience::Child),
            ticket("senior", "Senior (65+)", 300_000, TicketAudience::Adult),
        ],
        vec![
            add_on("guide", "Private guide", 200_000),
            add_on("lunch", "Seafood lunch", 150_000),
            add_on("transfer", "Hotel transfer", 100_000),
        ],
    )?)
}
