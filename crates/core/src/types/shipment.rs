//! Shipments and the shipment-status sub-form of the order detail view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ShipmentId;

/// Placeholder substituted with the tracking number in URL templates.
pub const TRACKING_PLACEHOLDER: &str = "{tracking}";

/// A shipment recorded against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: ShipmentId,
    #[serde(default)]
    pub tracking_number: Option<String>,
    pub status: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
}

/// Shipping carrier choice in the sub-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    Ups,
    Fedex,
    Dhl,
    Usps,
    /// Manual entry; no URL template.
    #[default]
    Other,
}

impl Carrier {
    pub const KNOWN: [Self; 4] = [Self::Ups, Self::Fedex, Self::Dhl, Self::Usps];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ups => "UPS",
            Self::Fedex => "FedEx",
            Self::Dhl => "DHL",
            Self::Usps => "USPS",
            Self::Other => "Other",
        }
    }

    /// Tracking URL template for known carriers.
    #[must_use]
    pub const fn tracking_url_template(self) -> Option<&'static str> {
        match self {
            Self::Ups => Some("https://www.ups.com/track?tracknum={tracking}"),
            Self::Fedex => Some("https://www.fedex.com/fedextrack/?trknbr={tracking}"),
            Self::Dhl => Some(
                "https://www.dhl.com/en/express/tracking.html?AWB={tracking}",
            ),
            Self::Usps => Some("https://tools.usps.com/go/TrackConfirmAction?tLabels={tracking}"),
            Self::Other => None,
        }
    }
}

impl std::str::FromStr for Carrier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::KNOWN
            .into_iter()
            .chain([Self::Other])
            .find(|c| c.label().to_ascii_lowercase() == lower)
            .ok_or_else(|| format!("unknown carrier: {s}"))
    }
}

/// Draft of a shipment being entered in the order detail sub-form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentDraft {
    carrier: Carrier,
    /// Free-text carrier name, used when `carrier` is `Other`.
    pub carrier_name: String,
    pub tracking_number: String,
    pub tracking_url: String,
    pub status: String,
}

impl ShipmentDraft {
    /// Empty draft with the given initial status.
    #[must_use]
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn carrier(&self) -> Carrier {
        self.carrier
    }

    /// Pick a carrier.
    ///
    /// A known carrier fills the carrier name and tracking URL template;
    /// `Other` clears both for manual entry.
    pub fn select_carrier(&mut self, carrier: Carrier) {
        self.carrier = carrier;
        match carrier.tracking_url_template() {
            Some(template) => {
                carrier.label().clone_into(&mut self.carrier_name);
                template.clone_into(&mut self.tracking_url);
            }
            None => {
                self.carrier_name.clear();
                self.tracking_url.clear();
            }
        }
    }

    /// Tracking URL with the tracking number filled in, if both are present.
    #[must_use]
    pub fn tracking_link(&self) -> Option<String> {
        let number = self.tracking_number.trim();
        if number.is_empty() || self.tracking_url.is_empty() {
            return None;
        }
        Some(self.tracking_url.replace(TRACKING_PLACEHOLDER, number))
    }

    pub(crate) fn into_shipment(self, at: DateTime<Utc>) -> Shipment {
        let tracking_url = self.tracking_link();
        let tracking_number = Some(self.tracking_number.trim().to_string()).filter(|n| !n.is_empty());
        let carrier = Some(self.carrier_name.trim().to_string()).filter(|n| !n.is_empty());
        Shipment {
            id: ShipmentId::new(uuid::Uuid::new_v4().to_string()),
            tracking_number,
            status: self.status,
            date: at.to_rfc3339(),
            carrier,
            tracking_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::{Order, OrderStatus};

    #[test]
    fn test_known_carrier_populates_template() {
        let mut draft = ShipmentDraft::new("Shipped");
        draft.select_carrier(Carrier::Ups);
        assert_eq!(draft.carrier_name, "UPS");
        assert!(draft.tracking_url.contains(TRACKING_PLACEHOLDER));

        draft.tracking_number = "1Z999".to_string();
        assert_eq!(
            draft.tracking_link().as_deref(),
            Some("https://www.ups.com/track?tracknum=1Z999")
        );
    }

    #[test]
    fn test_other_carrier_clears_fields() {
        let mut draft = ShipmentDraft::new("Shipped");
        draft.select_carrier(Carrier::Dhl);
        draft.select_carrier(Carrier::Other);
        assert!(draft.carrier_name.is_empty());
        assert!(draft.tracking_url.is_empty());
        assert_eq!(draft.tracking_link(), None);
    }

    #[test]
    fn test_carrier_from_str() {
        assert_eq!("fedex".parse::<Carrier>(), Ok(Carrier::Fedex));
        assert_eq!("Other".parse::<Carrier>(), Ok(Carrier::Other));
        assert!("pigeon".parse::<Carrier>().is_err());
    }

    #[test]
    fn test_add_and_update_shipment_on_order() {
        let mut order = Order::new("1002", OrderStatus::Processing, "2024-02-10");
        let mut draft = ShipmentDraft::new("Packed");
        draft.select_carrier(Carrier::Usps);
        draft.tracking_number = " 9400 ".to_string();

        let at = Utc.with_ymd_and_hms(2024, 2, 11, 9, 30, 0).unwrap();
        let id = order.add_shipment(draft, at);

        assert!(order.update_shipment_status(&id, "In transit"));
        let shipment = &order.shipments[0];
        assert_eq!(shipment.status, "In transit");
        assert_eq!(shipment.tracking_number.as_deref(), Some("9400"));
        assert_eq!(shipment.carrier.as_deref(), Some("USPS"));
        assert!(shipment.tracking_url.as_deref().unwrap().ends_with("9400"));
    }
}
