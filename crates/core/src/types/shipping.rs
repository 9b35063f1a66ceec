//! Shipping zones and the methods offered within them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Validate, ValidationError, require};
use super::id::{ShippingMethodId, ShippingZoneId};
use super::money::coerce_decimal;

/// A geographic zone with its own shipping methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShippingZoneId>,
    pub name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub methods: Vec<ShippingMethod>,
}

impl Entity for ShippingZone {
    type Id = ShippingZoneId;

    fn id(&self) -> Option<&ShippingZoneId> {
        self.id.as_ref()
    }
}

impl Validate for ShippingZone {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("country", &self.country)?;
        let code = self.country.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid(
                "country",
                "must be a two-letter country code",
            ));
        }
        Ok(())
    }
}

/// The kind of a shipping method, carrying only the fields it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShippingMethodKind {
    FlatRate {
        cost: Decimal,
    },
    LocalPickup {
        #[serde(default)]
        cost: Decimal,
    },
    FreeShipping {
        #[serde(default, rename = "minimumOrderAmount")]
        minimum_order_amount: Option<Decimal>,
    },
}

impl Default for ShippingMethodKind {
    fn default() -> Self {
        Self::FlatRate {
            cost: Decimal::ZERO,
        }
    }
}

impl ShippingMethodKind {
    /// Kind selected by name in the method dropdown, with fields reset.
    ///
    /// # Errors
    ///
    /// Returns an error for names outside the closed set of kinds.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        match name.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "flat_rate" => Ok(Self::FlatRate {
                cost: Decimal::ZERO,
            }),
            "local_pickup" => Ok(Self::LocalPickup {
                cost: Decimal::ZERO,
            }),
            "free_shipping" => Ok(Self::FreeShipping {
                minimum_order_amount: None,
            }),
            _ => Err(ValidationError::invalid(
                "type",
                format!("\"{name}\" is not a shipping method"),
            )),
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FlatRate { .. } => "Flat Rate",
            Self::LocalPickup { .. } => "Local Pickup",
            Self::FreeShipping { .. } => "Free Shipping",
        }
    }

    /// Whether the form shows a cost field.
    #[must_use]
    pub const fn has_cost(&self) -> bool {
        !matches!(self, Self::FreeShipping { .. })
    }

    /// Whether the form shows the minimum-order sub-form.
    #[must_use]
    pub const fn has_minimum_order(&self) -> bool {
        matches!(self, Self::FreeShipping { .. })
    }

    /// Cost charged to the customer for an order of `order_amount`.
    #[must_use]
    pub fn cost_for(&self, order_amount: Decimal) -> Option<Decimal> {
        match self {
            Self::FlatRate { cost } | Self::LocalPickup { cost } => Some(*cost),
            Self::FreeShipping {
                minimum_order_amount,
            } => match minimum_order_amount {
                Some(min) if order_amount < *min => None,
                _ => Some(Decimal::ZERO),
            },
        }
    }
}

/// A shipping method inside a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShippingMethodId>,
    pub title: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub kind: ShippingMethodKind,
}

const fn default_enabled() -> bool {
    true
}

impl Default for ShippingMethod {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            enabled: true,
            kind: ShippingMethodKind::default(),
        }
    }
}

impl ShippingMethod {
    /// Switch the kind from the dropdown. The title follows the kind label
    /// unless the user already typed a custom one.
    ///
    /// # Errors
    ///
    /// Returns an error for names outside the closed set of kinds.
    pub fn select_kind(&mut self, name: &str) -> Result<(), ValidationError> {
        let kind = ShippingMethodKind::from_name(name)?;
        if self.title.trim().is_empty() || self.title == self.kind.label() {
            kind.label().clone_into(&mut self.title);
        }
        self.kind = kind;
        Ok(())
    }

    /// Set the cost from form input; ignored for kinds without a cost.
    pub fn set_cost_input(&mut self, input: &str) {
        if let ShippingMethodKind::FlatRate { cost } | ShippingMethodKind::LocalPickup { cost } =
            &mut self.kind
        {
            *cost = coerce_decimal(input);
        }
    }

    /// Set the free-shipping minimum from form input. Blank clears it.
    pub fn set_minimum_order_input(&mut self, input: &str) {
        if let ShippingMethodKind::FreeShipping {
            minimum_order_amount,
        } = &mut self.kind
        {
            *minimum_order_amount = Some(input.trim())
                .filter(|s| !s.is_empty())
                .map(coerce_decimal);
        }
    }
}

impl Entity for ShippingMethod {
    type Id = ShippingMethodId;

    fn id(&self) -> Option<&ShippingMethodId> {
        self.id.as_ref()
    }
}

impl Validate for ShippingMethod {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        match &self.kind {
            ShippingMethodKind::FlatRate { cost } | ShippingMethodKind::LocalPickup { cost }
                if *cost < Decimal::ZERO =>
            {
                Err(ValidationError::invalid("cost", "cannot be negative"))
            }
            ShippingMethodKind::FreeShipping {
                minimum_order_amount: Some(min),
            } if *min < Decimal::ZERO => Err(ValidationError::invalid(
                "minimumOrderAmount",
                "cannot be negative",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_requires_name_and_country() {
        let mut zone = ShippingZone {
            name: "Europe".to_string(),
            ..ShippingZone::default()
        };
        assert_eq!(
            zone.validate(),
            Err(ValidationError::Required { field: "country" })
        );
        zone.country = "Germany".to_string();
        assert_eq!(zone.validate().map_err(|e| e.field()), Err("country"));
        zone.country = "DE".to_string();
        assert!(zone.validate().is_ok());
    }

    #[test]
    fn test_free_shipping_hides_cost_and_shows_minimum() {
        let mut method = ShippingMethod::default();
        method.select_kind("Free Shipping").unwrap();
        assert_eq!(method.title, "Free Shipping");
        assert!(!method.kind.has_cost());
        assert!(method.kind.has_minimum_order());

        method.set_cost_input("9.99");
        method.set_minimum_order_input("50");
        assert_eq!(
            method.kind,
            ShippingMethodKind::FreeShipping {
                minimum_order_amount: Some(Decimal::from(50))
            }
        );
        assert_eq!(method.kind.cost_for(Decimal::from(20)), None);
        assert_eq!(method.kind.cost_for(Decimal::from(80)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_cost_input_coerces_garbage_to_zero() {
        let mut method = ShippingMethod::default();
        method.select_kind("flat_rate").unwrap();
        method.set_cost_input("abc");
        assert_eq!(method.kind.cost_for(Decimal::ONE), Some(Decimal::ZERO));
        method.set_cost_input("4.50");
        assert_eq!(method.kind.cost_for(Decimal::ONE), Some(Decimal::new(450, 2)));
    }

    #[test]
    fn test_custom_title_survives_kind_change() {
        let mut method = ShippingMethod {
            title: "Courier".to_string(),
            ..ShippingMethod::default()
        };
        method.select_kind("local-pickup").unwrap();
        assert_eq!(method.title, "Courier");
        assert!(method.select_kind("teleport").is_err());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let method = ShippingMethod {
            title: "Flat".to_string(),
            kind: ShippingMethodKind::FlatRate {
                cost: Decimal::new(-1, 0),
            },
            ..ShippingMethod::default()
        };
        assert_eq!(method.validate().map_err(|e| e.field()), Err("cost"));
    }

    #[test]
    fn test_method_wire_format_is_tagged() {
        let json = r#"{"id": 5, "title": "Pickup", "type": "local_pickup", "cost": "2.00"}"#;
        let method: ShippingMethod = serde_json::from_str(json).unwrap();
        assert!(method.enabled);
        assert_eq!(
            method.kind,
            ShippingMethodKind::LocalPickup {
                cost: Decimal::new(200, 2)
            }
        );
        let back = serde_json::to_value(&method).unwrap();
        assert_eq!(back["type"], "local_pickup");
    }
}
