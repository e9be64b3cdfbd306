//! Attribute set of a registered company.
//!
//! Text attributes are normalized on the way in: surrounding whitespace is
//! trimmed and empty strings become `None`, so storage never holds `""`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Characters permitted in a tax id besides ASCII digits (CNPJ/CPF punctuation).
const TAX_ID_PUNCTUATION: &[char] = &['.', '-', '/'];

/// Trims a text attribute and collapses blank values to `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates a tax id: digits plus `.`, `-`, `/`, and at least one digit.
pub fn validate_tax_id(field: &str, value: &str) -> Result<(), ValidationError> {
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(field, "must contain digits"));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_digit() && !TAX_ID_PUNCTUATION.contains(c))
    {
        return Err(ValidationError::invalid_format(
            field,
            format!("unexpected character '{}'", bad),
        ));
    }
    Ok(())
}

/// Services the company contracted (the six checkboxes of the proposal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceFlags {
    pub spc: bool,
    pub nfe: bool,
    pub nfce: bool,
    pub mdfe: bool,
    pub cte: bool,
    pub cfe: bool,
}

/// Channels the company authorised for contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactConsent {
    pub site: bool,
    pub whatsapp: bool,
    pub email: bool,
}

/// Every attribute of a company except identity, partners and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityFields {
    pub fantasy_name: String,
    pub corporate_name: Option<String>,
    pub tax_id: Option<String>,
    pub state_registration: Option<String>,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub business_activity: Option<String>,
    pub foundation_date: Option<String>,
    pub employee_count: Option<i32>,
    pub sector: Option<String>,
    pub accounting_firm: Option<String>,
    pub referral: Option<String>,
    pub notes: Option<String>,
    pub services: ServiceFlags,
    pub services_notes: Option<String>,
    pub plan_type: Option<String>,
    pub plan_value: Option<String>,
    pub due_date: Option<String>,
    pub contact: ContactConsent,
}

impl EntityFields {
    /// Convenience constructor with only the required attribute set.
    pub fn named(fantasy_name: impl Into<String>) -> Self {
        Self {
            fantasy_name: fantasy_name.into(),
            ..Self::default()
        }
    }

    /// Trims every text attribute; blank optional text becomes `None`.
    pub fn normalized(self) -> Self {
        Self {
            fantasy_name: self.fantasy_name.trim().to_string(),
            corporate_name: normalize_text(self.corporate_name),
            tax_id: normalize_text(self.tax_id),
            state_registration: normalize_text(self.state_registration),
            address: normalize_text(self.address),
            zip: normalize_text(self.zip),
            city: normalize_text(self.city),
            state: normalize_text(self.state),
            phone: normalize_text(self.phone),
            mobile: normalize_text(self.mobile),
            whatsapp: normalize_text(self.whatsapp),
            email: normalize_text(self.email),
            instagram: normalize_text(self.instagram),
            business_activity: normalize_text(self.business_activity),
            foundation_date: normalize_text(self.foundation_date),
            employee_count: self.employee_count,
            sector: normalize_text(self.sector),
            accounting_firm: normalize_text(self.accounting_firm),
            referral: normalize_text(self.referral),
            notes: normalize_text(self.notes),
            services: self.services,
            services_notes: normalize_text(self.services_notes),
            plan_type: normalize_text(self.plan_type),
            plan_value: normalize_text(self.plan_value),
            due_date: normalize_text(self.due_date),
            contact: self.contact,
        }
    }

    /// Checks the invariants every stored company must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fantasy_name.trim().is_empty() {
            return Err(ValidationError::empty_field("fantasy_name"));
        }
        if let Some(tax_id) = &self.tax_id {
            validate_tax_id("tax_id", tax_id)?;
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format("email", "missing '@'"));
            }
        }
        if matches!(self.employee_count, Some(n) if n < 0) {
            return Err(ValidationError::invalid_format(
                "employee_count",
                "cannot be negative",
            ));
        }
        Ok(())
    }
}
