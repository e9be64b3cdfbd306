//! Business entity (company) domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - BusinessEntity aggregate and listing summary
//! - `fields` - Attribute set, normalization and validation rules
//! - `partner` - Owned partner records
//! - `patch` - Partial updates
//! - `audit` - Audit trail rows

mod aggregate;
mod audit;
mod fields;
mod partner;
mod patch;

pub use aggregate::{BusinessEntity, EntitySummary};
pub use audit::{AuditAction, AuditEntry, COMPANY_ENTITY_TYPE};
pub use fields::{normalize_text, validate_tax_id, ContactConsent, EntityFields, ServiceFlags};
pub use partner::{clean_partners, Partner};
pub use patch::{ContactConsentPatch, EntityPatch, ServiceFlagsPatch};
