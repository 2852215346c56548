//! Inventory models.

use serde::{Deserialize, Serialize};

use super::{require, wire, Collection, Resource, Validate, ValidationError};

/// Inventory category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    #[default]
    Food,
    Medicine,
}

impl InventoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryCategory::Food => "food",
            InventoryCategory::Medicine => "medicine",
        }
    }
}

impl std::fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InventoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(InventoryCategory::Food),
            "medicine" => Ok(InventoryCategory::Medicine),
            other => Err(format!("unknown inventory category: {}", other)),
        }
    }
}

/// A stocked supply item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: InventoryCategory,
    #[serde(deserialize_with = "wire::number")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    /// Restock below this quantity
    #[serde(default, deserialize_with = "wire::number")]
    pub min_threshold: f64,
    /// Cost per unit in rupees
    #[serde(default, deserialize_with = "wire::number")]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_string", skip_serializing_if = "Option::is_none")]
    pub last_restocked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl Resource for InventoryItem {
    const COLLECTION: Collection = Collection::Inventory;

    fn id(&self) -> &str {
        &self.id
    }
}

impl InventoryItem {
    /// Strictly below threshold; equal is not low.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_threshold
    }

    /// Stock value at the per-unit cost.
    pub fn total_value(&self) -> f64 {
        self.quantity * self.cost
    }

    /// Case-insensitive match on name or supplier.
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q)
            || self
                .supplier
                .as_deref()
                .map(|s| s.to_lowercase().contains(&q))
                .unwrap_or(false)
    }
}

/// Add/edit form for an inventory item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDraft {
    pub name: String,
    pub category: InventoryCategory,
    pub quantity: f64,
    pub unit: String,
    pub min_threshold: f64,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl Validate for InventoryDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("unit", &self.unit)?;
        Ok(())
    }
}

impl InventoryDraft {
    /// Prefill the edit form from an existing item.
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category,
            quantity: item.quantity,
            unit: item.unit.clone(),
            min_threshold: item.min_threshold,
            cost: item.cost,
            supplier: item.supplier.clone(),
            expiry_date: item.expiry_date.clone(),
        }
    }

    /// Full-field patch used when the form is saved in edit mode.
    pub fn to_patch(&self, last_restocked: Option<String>) -> InventoryPatch {
        InventoryPatch {
            name: Some(self.name.clone()),
            category: Some(self.category),
            quantity: Some(self.quantity),
            unit: Some(self.unit.clone()),
            min_threshold: Some(self.min_threshold),
            cost: Some(self.cost),
            supplier: self.supplier.clone(),
            expiry_date: self.expiry_date.clone(),
            last_restocked,
        }
    }
}

/// Partial update for an inventory item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<InventoryCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_restocked: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_meat(quantity: f64) -> InventoryItem {
        InventoryItem {
            id: "i1".into(),
            name: "Raw Meat".into(),
            category: InventoryCategory::Food,
            quantity,
            unit: "kg".into(),
            min_threshold: 50.0,
            cost: 450.0,
            supplier: Some("Fresh Farms".into()),
            last_restocked: None,
            expiry_date: None,
        }
    }

    #[test]
    fn test_low_stock_boundary() {
        assert!(raw_meat(40.0).is_low_stock());
        assert!(!raw_meat(50.0).is_low_stock());
        assert!(!raw_meat(150.0).is_low_stock());
    }

    #[test]
    fn test_total_value() {
        assert_eq!(raw_meat(150.0).total_value(), 67_500.0);
    }

    #[test]
    fn test_search_supplier() {
        let item = raw_meat(10.0);
        assert!(item.matches_search("fresh"));
        assert!(item.matches_search("MEAT"));
        assert!(!item.matches_search("medivet"));
    }

    #[test]
    fn test_string_quantities_from_wire() {
        let item: InventoryItem = serde_json::from_value(serde_json::json!({
            "id": "i9", "name": "Hay", "category": "food",
            "quantity": "40", "unit": "bales", "minThreshold": "50", "cost": 120
        }))
        .unwrap();
        assert!(item.is_low_stock());
        assert_eq!(item.cost, 120.0);
    }

    #[test]
    fn test_draft_round_trip_to_patch() {
        let item = raw_meat(150.0);
        let patch = InventoryDraft::from_item(&item).to_patch(Some("Just now".into()));
        assert_eq!(patch.quantity, Some(150.0));
        assert_eq!(patch.last_restocked.as_deref(), Some("Just now"));
    }
}
