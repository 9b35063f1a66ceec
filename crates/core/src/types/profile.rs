//! The vendor's own store profile.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::entity::{Validate, ValidationError, require};

/// Store profile shown on the vendor's public page and used for payouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorProfile {
    pub store_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    /// Where payouts are sent; falls back to `email` when unset.
    pub payout_email: Option<String>,
}

impl VendorProfile {
    /// Address payouts are sent to.
    #[must_use]
    pub fn effective_payout_email(&self) -> &str {
        self.payout_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

impl Validate for VendorProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        require("storeName", &self.store_name)?;
        Email::parse(&self.email).map_err(|e| ValidationError::invalid("email", e.to_string()))?;
        if let Some(payout) = self.payout_email.as_deref().filter(|e| !e.trim().is_empty()) {
            Email::parse(payout)
                .map_err(|e| ValidationError::invalid("payoutEmail", e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_email_fallback() {
        let mut profile = VendorProfile {
            store_name: "Acme".to_string(),
            email: "shop@acme.io".to_string(),
            ..VendorProfile::default()
        };
        assert_eq!(profile.effective_payout_email(), "shop@acme.io");
        profile.payout_email = Some("pay@acme.io".to_string());
        assert_eq!(profile.effective_payout_email(), "pay@acme.io");
        assert!(profile.validate().is_ok());

        profile.payout_email = Some("nope".to_string());
        assert_eq!(profile.validate().map_err(|e| e.field()), Err("payoutEmail"));
    }
}
