//! Partial update of a company.
//!
//! A field that is absent from the patch is left untouched. Sending an empty
//! string clears an optional text attribute.

use serde::{Deserialize, Serialize};

use super::fields::{normalize_text, ContactConsent, EntityFields, ServiceFlags};
use super::partner::{clean_partners, Partner};
use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceFlagsPatch {
    pub spc: Option<bool>,
    pub nfe: Option<bool>,
    pub nfce: Option<bool>,
    pub mdfe: Option<bool>,
    pub cte: Option<bool>,
    pub cfe: Option<bool>,
}

impl ServiceFlagsPatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, flags: &mut ServiceFlags) {
        let pairs = [
            (self.spc, &mut flags.spc),
            (self.nfe, &mut flags.nfe),
            (self.nfce, &mut flags.nfce),
            (self.mdfe, &mut flags.mdfe),
            (self.cte, &mut flags.cte),
            (self.cfe, &mut flags.cfe),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactConsentPatch {
    pub site: Option<bool>,
    pub whatsapp: Option<bool>,
    pub email: Option<bool>,
}

impl ContactConsentPatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, consent: &mut ContactConsent) {
        let pairs = [
            (self.site, &mut consent.site),
            (self.whatsapp, &mut consent.whatsapp),
            (self.email, &mut consent.email),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Fields present in an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityPatch {
    pub fantasy_name: Option<String>,
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
    pub services: ServiceFlagsPatch,
    pub services_notes: Option<String>,
    pub plan_type: Option<String>,
    pub plan_value: Option<String>,
    pub due_date: Option<String>,
    pub contact: ContactConsentPatch,

    /// Replacement partner list. `None` keeps the current partners.
    pub partners: Option<Vec<Partner>>,
}

impl EntityPatch {
    /// True when the patch touches no attribute and no partner.
    pub fn is_empty(&self) -> bool {
        let text_fields = [
            &self.fantasy_name,
            &self.corporate_name,
            &self.tax_id,
            &self.state_registration,
            &self.address,
            &self.zip,
            &self.city,
            &self.state,
            &self.phone,
            &self.mobile,
            &self.whatsapp,
            &self.email,
            &self.instagram,
            &self.business_activity,
            &self.foundation_date,
            &self.sector,
            &self.accounting_firm,
            &self.referral,
            &self.notes,
            &self.services_notes,
            &self.plan_type,
            &self.plan_value,
            &self.due_date,
        ];
        text_fields.iter().all(|f| f.is_none())
            && self.employee_count.is_none()
            && self.services.is_empty()
            && self.contact.is_empty()
            && self.partners.is_none()
    }

    /// Applies the patch to a copy of `current` and validates the result.
    pub fn apply_to(&self, current: &EntityFields) -> Result<EntityFields, ValidationError> {
        let mut next = current.clone();

        if let Some(name) = &self.fantasy_name {
            next.fantasy_name = name.trim().to_string();
        }

        let text_updates = [
            (&self.corporate_name, &mut next.corporate_name),
            (&self.tax_id, &mut next.tax_id),
            (&self.state_registration, &mut next.state_registration),
            (&self.address, &mut next.address),
            (&self.zip, &mut next.zip),
            (&self.city, &mut next.city),
            (&self.state, &mut next.state),
            (&self.phone, &mut next.phone),
            (&self.mobile, &mut next.mobile),
            (&self.whatsapp, &mut next.whatsapp),
            (&self.email, &mut next.email),
            (&self.instagram, &mut next.instagram),
            (&self.business_activity, &mut next.business_activity),
            (&self.foundation_date, &mut next.foundation_date),
            (&self.sector, &mut next.sector),
            (&self.accounting_firm, &mut next.accounting_firm),
            (&self.referral, &mut next.referral),
            (&self.notes, &mut next.notes),
            (&self.services_notes, &mut next.services_notes),
            (&self.plan_type, &mut next.plan_type),
            (&self.plan_value, &mut next.plan_value),
            (&self.due_date, &mut next.due_date),
        ];
        for (value, slot) in text_updates {
            if value.is_some() {
                *slot = normalize_text(value.clone());
            }
        }

        if self.employee_count.is_some() {
            next.employee_count = self.employee_count;
        }
        self.services.apply(&mut next.services);
        self.contact.apply(&mut next.contact);

        next.validate()?;
        Ok(next)
    }

    /// Cleaned replacement partner list, if the patch carries one.
    pub fn cleaned_partners(&self) -> Result<Option<Vec<Partner>>, ValidationError> {
        self.partners.clone().map(clean_partners).transpose()
    }
}
