//! # Inventory Catalog
//!
//! The read-only reference data a booking flow runs against: units,
//! ticket types, add-on services and the discount rules of one
//! [`BookingKind`].
//!
//! Construction is the validation boundary. A catalog that exists is
//! well-formed, which is what lets the filter, evaluator and aggregator
//! stay infallible.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::DiscountCatalog;
use crate::error::ValidationError;
use crate::types::{AddOnService, BookingKind, InventoryUnit, TicketType};
use crate::validation::{
    validate_add_on, validate_inventory_unit, validate_ticket_type, validate_unique_ids,
};

/// Everything a booking flow can select from.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCatalog {
    kind: BookingKind,
    units: Vec<InventoryUnit>,
    tickets: Vec<TicketType>,
    add_ons: Vec<AddOnService>,
    discounts: DiscountCatalog,
}

/// Wire shape supplied by the inventory collaborator.
///
/// `discounts` is optional: when omitted, the built-in rules of `kind`
/// are used.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSource {
    pub kind: BookingKind,
    #[serde(default)]
    pub units: Vec<InventoryUnit>,
    #[serde(default)]
    pub tickets: Vec<TicketType>,
    #[serde(default)]
    pub add_ons: Vec<AddOnService>,
    #[serde(default)]
    pub discounts: Option<DiscountCatalog>,
}

impl InventoryCatalog {
    /// Validates and assembles a catalog.
    ///
    /// ## Rules
    /// - every unit, ticket and add-on passes its validator
    /// - ids are unique within each collection
    /// - the discount catalog belongs to the same booking kind
    pub fn new(
        kind: BookingKind,
        units: Vec<InventoryUnit>,
        tickets: Vec<TicketType>,
        add_ons: Vec<AddOnService>,
        discounts: DiscountCatalog,
    ) -> Result<Self, ValidationError> {
        for unit in &units {
            validate_inventory_unit(unit)?;
        }
        for ticket in &tickets {
            validate_ticket_type(ticket)?;
        }
        for add_on in &add_ons {
            validate_add_on(add_on)?;
        }
        validate_unique_ids("unit id", units.iter().map(|u| u.id.as_str()))?;
        validate_unique_ids("ticket id", tickets.iter().map(|t| t.id.as_str()))?;
        validate_unique_ids("add-on id", add_ons.iter().map(|a| a.id.as_str()))?;

        if discounts.kind() != kind {
            return Err(ValidationError::InvalidFormat {
                field: "discounts".to_string(),
                reason: format!(
                    "rules are for {:?} bookings, catalog is {:?}",
                    discounts.kind(),
                    kind
                ),
            });
        }

        Ok(InventoryCatalog {
            kind,
            units,
            tickets,
            add_ons,
            discounts,
        })
    }

    /// Lodging catalog with the built-in lodging promotions.
    pub fn lodging(units: Vec<InventoryUnit>) -> Result<Self, ValidationError> {
        InventoryCatalog::new(
            BookingKind::Lodging,
            units,
            Vec::new(),
            Vec::new(),
            DiscountCatalog::lodging(),
        )
    }

    /// Ticketed catalog with the built-in ticketed promotions.
    pub fn ticketed(
        tickets: Vec<TicketType>,
        add_ons: Vec<AddOnService>,
    ) -> Result<Self, ValidationError> {
        InventoryCatalog::new(
            BookingKind::Ticketed,
            Vec::new(),
            tickets,
            add_ons,
            DiscountCatalog::ticketed(),
        )
    }

    #[inline]
    pub fn kind(&self) -> BookingKind {
        self.kind
    }

    #[inline]
    pub fn units(&self) -> &[InventoryUnit] {
        &self.units
    }

    #[inline]
    pub fn tickets(&self) -> &[TicketType] {
        &self.tickets
    }

    #[inline]
    pub fn add_ons(&self) -> &[AddOnService] {
        &self.add_ons
    }

    #[inline]
    pub fn discounts(&self) -> &DiscountCatalog {
        &self.discounts
    }

    pub fn unit(&self, id: &str) -> Option<&InventoryUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn ticket(&self, id: &str) -> Option<&TicketType> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn add_on(&self, id: &str) -> Option<&AddOnService> {
        self.add_ons.iter().find(|a| a.id == id)
    }
}

impl TryFrom<CatalogSource> for InventoryCatalog {
    type Error = ValidationError;

    fn try_from(source: CatalogSource) -> Result<Self, Self::Error> {
        let discounts = source
            .discounts
            .unwrap_or_else(|| DiscountCatalog::for_kind(source.kind));
        InventoryCatalog::new(
            source.kind,
            source.units,
            source.tickets,
            source.add_ons,
            discounts,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn unit(id: &str) -> InventoryUnit {
        InventoryUnit {
            id: id.to_string(),
            name: format!("Room {}", id),
            unit_type: "Standard".to_string(),
            capacity: 2,
            nightly_price: Money::from_minor(120),
            available: true,
            reservations: Vec::new(),
        }
    }

    #[test]
    fn test_lodging_catalog_lookup() {
        let catalog = InventoryCatalog::lodging(vec![unit("R1"), unit("R2")]).unwrap();
        assert_eq!(catalog.kind(), BookingKind::Lodging);
        assert_eq!(catalog.units().len(), 2);
        assert!(catalog.unit("R2").is_some());
        assert!(catalog.unit("R9").is_none());
        assert_eq!(catalog.discounts().kind(), BookingKind::Lodging);
    }

    #[test]
    fn test_catalog_rejects_duplicate_units() {
        let err = InventoryCatalog::lodging(vec![unit("R1"), unit("R1")]).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_catalog_rejects_mismatched_discounts() {
        let err = InventoryCatalog::new(
            BookingKind::Lodging,
            vec![unit("R1")],
            Vec::new(),
            Vec::new(),
            DiscountCatalog::ticketed(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_catalog_from_json_source() {
        let json = r#"{
            "kind": "lodging",
            "units": [{
                "id": "R1",
                "name": "Garden Room",
                "unitType": "Standard",
                "capacity": 2,
                "nightlyPrice": 120,
                "available": true,
                "reservations": [
                    { "start": "2025-10-20T00:00:00Z", "end": "2025-10-22T00:00:00Z" }
                ]
            }]
        }"#;
        let source: CatalogSource = serde_json::from_str(json).unwrap();
        let catalog = InventoryCatalog::try_from(source).unwrap();
        assert_eq!(catalog.units()[0].reservations.len(), 1);
        assert_eq!(catalog.discounts(), &DiscountCatalog::lodging());
    }

    #[test]
    fn test_catalog_from_json_rejects_zero_capacity() {
        let json = r#"{
            "kind": "lodging",
            "units": [{
                "id": "R1", "name": "Broom Cupboard", "unitType": "Standard",
                "capacity": 0, "nightlyPrice": 10, "available": true
            }]
        }"#;
        let source: CatalogSource = serde_json::from_str(json).unwrap();
        assert!(InventoryCatalog::try_from(source).is_err());
    }
}
