//! KYC verification documents and store policies.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Validate, ValidationError, require};
use super::id::{KycDocumentId, PolicyId};

/// Review state of an uploaded KYC document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A KYC document. The file itself is uploaded elsewhere; this record holds
/// its URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<KycDocumentId>,
    /// e.g. "passport", "business_license".
    pub document_type: String,
    pub file_url: String,
    #[serde(default)]
    pub status: KycStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl KycDocument {
    /// Approved and rejected documents are locked in the console.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status == KycStatus::Pending
    }
}

impl Entity for KycDocument {
    type Id = KycDocumentId;

    fn id(&self) -> Option<&KycDocumentId> {
        self.id.as_ref()
    }
}

impl Validate for KycDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        require("documentType", &self.document_type)?;
        require("fileUrl", &self.file_url)?;
        let url = self.file_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ValidationError::invalid("fileUrl", "must be an http(s) URL"));
        }
        Ok(())
    }
}

/// Which store policy a text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Shipping,
    Refund,
    Privacy,
    Terms,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PolicyId>,
    pub kind: PolicyKind,
    pub content: String,
}

impl Entity for Policy {
    type Id = PolicyId;

    fn id(&self) -> Option<&PolicyId> {
        self.id.as_ref()
    }
}

impl Validate for Policy {
    fn validate(&self) -> Result<(), ValidationError> {
        require("content", &self.content)
    }
}
