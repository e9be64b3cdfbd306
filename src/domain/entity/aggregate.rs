//! BusinessEntity aggregate.
//!
//! # Invariants
//!
//! - `fields` always pass `EntityFields::validate`
//! - `partners` never contains a blank row
//! - `signature_ref` names the live signature artifact, or is `None`

use serde::{Deserialize, Serialize};

use super::fields::EntityFields;
use super::partner::{clean_partners, Partner};
use super::patch::EntityPatch;
use crate::domain::foundation::{EntityId, Timestamp, ValidationError};

/// A registered company with its owned partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessEntity {
    pub id: EntityId,

    #[serde(flatten)]
    pub fields: EntityFields,

    pub partners: Vec<Partner>,

    /// Reference to the current signature artifact in the signature store.
    pub signature_ref: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BusinessEntity {
    /// Builds a new entity, normalizing and validating input.
    ///
    /// The id is assigned here but only becomes observable once the
    /// repository commits the insert.
    pub fn register(fields: EntityFields, partners: Vec<Partner>) -> Result<Self, ValidationError> {
        let fields = fields.normalized();
        fields.validate()?;
        let partners = clean_partners(partners)?;
        let now = Timestamp::now();

        Ok(Self {
            id: EntityId::new(),
            fields,
            partners,
            signature_ref: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a validated patch in place and bumps `updated_at`.
    pub fn apply_patch(&mut self, patch: &EntityPatch) -> Result<(), ValidationError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        let fields = patch.apply_to(&self.fields)?;
        let partners = patch.cleaned_partners()?;

        self.fields = fields;
        if let Some(partners) = partners {
            self.partners = partners;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            id: self.id,
            fantasy_name: self.fields.fantasy_name.clone(),
            tax_id: self.fields.tax_id.clone(),
            city: self.fields.city.clone(),
            state: self.fields.state.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Listing projection of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub id: EntityId,
    pub fantasy_name: String,
    pub tax_id: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub updated_at: Timestamp,
}
