//! Order status and the status tabs of the orders list.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by the vendor backend.
///
/// Decoding goes through [`FromStr`](std::str::FromStr), so the wire value
/// is matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
    Refund,
}

impl OrderStatus {
    /// Every status, in tab order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Failed,
        Self::Refund,
    ];

    /// Display label, identical to the wire value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
            Self::Refund => "Refund",
        }
    }

    /// Position of this status within [`OrderStatus::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "failed" => Ok(Self::Failed),
            "refund" | "refunded" => Ok(Self::Refund),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Active tab of the orders list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusTab {
    /// No status restriction.
    #[default]
    All,
    /// Only orders with the given status.
    Status(OrderStatus),
}

impl StatusTab {
    /// Whether an order with `status` is visible under this tab.
    #[must_use]
    pub fn admits(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Status(s) => s == status,
        }
    }
}

impl From<OrderStatus> for StatusTab {
    fn from(status: OrderStatus) -> Self {
        Self::Status(status)
    }
}

impl std::fmt::Display for StatusTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Status(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for StatusTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            return Ok(Self::All);
        }
        s.parse::<OrderStatus>().map(Self::Status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("DELIVERED".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert_eq!("refunded".parse::<OrderStatus>(), Ok(OrderStatus::Refund));
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, r#""Cancelled""#);
        let status: OrderStatus = serde_json::from_str(r#""Refunded""#).unwrap();
        assert_eq!(status, OrderStatus::Refund);
    }

    #[test]
    fn test_status_decodes_any_case() {
        let statuses: Vec<OrderStatus> =
            serde_json::from_str(r#"["pending", "DELIVERED", "Shipped", "canceled"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![
                OrderStatus::Pending,
                OrderStatus::Delivered,
                OrderStatus::Shipped,
                OrderStatus::Cancelled,
            ]
        );
        assert!(serde_json::from_str::<OrderStatus>(r#""lost""#).is_err());
    }

    #[test]
    fn test_status_index_matches_all() {
        for (i, status) in OrderStatus::ALL.iter().enumerate() {
            assert_eq!(status.index(), i);
        }
    }

    #[test]
    fn test_tab_admits() {
        assert!(StatusTab::All.admits(OrderStatus::Failed));
        assert!(StatusTab::Status(OrderStatus::Pending).admits(OrderStatus::Pending));
        assert!(!StatusTab::Status(OrderStatus::Pending).admits(OrderStatus::Shipped));
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("all".parse::<StatusTab>(), Ok(StatusTab::All));
        assert_eq!(
            "shipped".parse::<StatusTab>(),
            Ok(StatusTab::Status(OrderStatus::Shipped))
        );
    }
}
