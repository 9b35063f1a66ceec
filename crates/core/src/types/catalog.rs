//! Product attributes (variations) and the categories they link to.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, Validate, ValidationError, require};
use super::id::{AttributeId, CategoryId};

/// A product attribute such as "Color" with its selectable values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AttributeId>,
    pub name: String,
    /// Attribute group shown as the section heading in the product editor.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

impl Attribute {
    /// Blank template for the create form.
    #[must_use]
    pub fn draft(name: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            group: group.to_string(),
            ..Self::default()
        }
    }

    /// Parse a comma-separated value list as typed into the form.
    pub fn set_values_from_input(&mut self, input: &str) {
        self.values = input
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .collect();
    }
}

impl Entity for Attribute {
    type Id = AttributeId;

    fn id(&self) -> Option<&AttributeId> {
        self.id.as_ref()
    }
}

impl Validate for Attribute {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("group", &self.group)?;
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.values.iter().find(|v| !seen.insert(v.to_lowercase())) {
            return Err(ValidationError::invalid(
                "values",
                format!("contains \"{dup}\" more than once"),
            ));
        }
        Ok(())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> Option<&CategoryId> {
        Some(&self.id)
    }
}
