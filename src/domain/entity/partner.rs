//! Partner (owner/shareholder) records owned by a company.

use serde::{Deserialize, Serialize};

use super::fields::{normalize_text, validate_tax_id};
use crate::domain::foundation::ValidationError;

/// A partner of the company. The list is replaced as a whole on each write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Partner {
    pub name: Option<String>,
    pub tax_id: Option<String>,
}

impl Partner {
    pub fn new(name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tax_id: Some(tax_id.into()),
        }
    }

    /// True when neither name nor tax id carries any text.
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.tax_id.is_none()
    }
}

/// Normalizes a submitted partner list: trims text, drops blank rows and
/// validates the tax ids that remain.
pub fn clean_partners(partners: Vec<Partner>) -> Result<Vec<Partner>, ValidationError> {
    let mut cleaned = Vec::with_capacity(partners.len());
    for partner in partners {
        let partner = Partner {
            name: normalize_text(partner.name),
            tax_id: normalize_text(partner.tax_id),
        };
        if partner.is_blank() {
            continue;
        }
        if let Some(tax_id) = &partner.tax_id {
            validate_tax_id("partners.tax_id", tax_id)?;
        }
        cleaned.push(partner);
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_partners_are_skipped() {
        let cleaned = clean_partners(vec![
            Partner::default(),
            Partner {
                name: Some("  ".into()),
                tax_id: Some("".into()),
            },
            Partner::new("Ana", "111"),
        ])
        .unwrap();

        assert_eq!(cleaned, vec![Partner::new("Ana", "111")]);
    }

    #[test]
    fn partner_with_only_a_name_is_kept() {
        let cleaned = clean_partners(vec![Partner {
            name: Some("Bruno".into()),
            tax_id: None,
        }])
        .unwrap();
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn invalid_partner_tax_id_is_rejected() {
        let err = clean_partners(vec![Partner::new("Ana", "abc1")]).unwrap_err();
        assert_eq!(err.field(), Some("partners.tax_id"));
    }
}
