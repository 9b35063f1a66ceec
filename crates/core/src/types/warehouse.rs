//! Warehouses the vendor ships from.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Validate, ValidationError, require};
use super::id::WarehouseId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WarehouseId>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> Option<&WarehouseId> {
        self.id.as_ref()
    }
}

impl Validate for Warehouse {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("address", &self.address)
    }
}

/// Mark `id` as the default warehouse, clearing the flag everywhere else.
pub fn make_default(warehouses: &mut [Warehouse], id: &WarehouseId) {
    for warehouse in warehouses {
        warehouse.is_default = warehouse.id.as_ref() == Some(id);
    }
}
