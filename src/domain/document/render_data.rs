//! Data record handed to the document renderer.
//!
//! Keys are snake_case and every text attribute is present (empty string
//! when unset) so templates never have to guard against missing values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use super::ImageFormat;
use crate::domain::entity::BusinessEntity;
use crate::domain::foundation::Timestamp;

/// Signature bytes embedded into the document.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSignature<'a> {
    pub format: ImageFormat,
    pub bytes: &'a [u8],
}

fn text(value: &Option<String>) -> Value {
    Value::String(value.clone().unwrap_or_default())
}

/// "City/UF, dd/mm/yyyy" line printed above the signature.
fn place_and_date(city: Option<&str>, state: Option<&str>, generated_at: Timestamp) -> String {
    let place = match (city, state) {
        (Some(city), Some(state)) => format!("{}/{}", city, state),
        (Some(place), None) | (None, Some(place)) => place.to_string(),
        (None, None) => return generated_at.to_document_date(),
    };
    format!("{}, {}", place, generated_at.to_document_date())
}

/// Builds the template data record for one document version.
pub fn build_render_data(
    entity: &BusinessEntity,
    version: u32,
    signature: Option<EmbeddedSignature<'_>>,
    generated_at: Timestamp,
) -> Value {
    let f = &entity.fields;

    let partners: Vec<Value> = entity
        .partners
        .iter()
        .map(|p| json!({ "name": text(&p.name), "tax_id": text(&p.tax_id) }))
        .collect();

    let (signature_b64, signature_mime) = match signature {
        Some(sig) => (
            Value::String(STANDARD.encode(sig.bytes)),
            Value::String(sig.format.mime_type().to_string()),
        ),
        None => (Value::Null, Value::Null),
    };

    json!({
        "entity_id": entity.id.to_string(),
        "fantasy_name": f.fantasy_name,
        "corporate_name": text(&f.corporate_name),
        "tax_id": text(&f.tax_id),
        "state_registration": text(&f.state_registration),
        "address": text(&f.address),
        "zip": text(&f.zip),
        "city": text(&f.city),
        "state": text(&f.state),
        "phone": text(&f.phone),
        "mobile": text(&f.mobile),
        "whatsapp": text(&f.whatsapp),
        "email": text(&f.email),
        "instagram": text(&f.instagram),
        "business_activity": text(&f.business_activity),
        "foundation_date": text(&f.foundation_date),
        "employee_count": f.employee_count.map(|n| n.to_string()).unwrap_or_default(),
        "sector": text(&f.sector),
        "accounting_firm": text(&f.accounting_firm),
        "referral": text(&f.referral),
        "notes": text(&f.notes),
        "has_notes": f.notes.is_some(),
        "partners": partners,
        "svc_spc": f.services.spc,
        "svc_nfe": f.services.nfe,
        "svc_nfce": f.services.nfce,
        "svc_mdfe": f.services.mdfe,
        "svc_cte": f.services.cte,
        "svc_cfe": f.services.cfe,
        "services_notes": text(&f.services_notes),
        "plan_type": text(&f.plan_type),
        "plan_value": text(&f.plan_value),
        "due_date": text(&f.due_date),
        "auth_site": f.contact.site,
        "auth_whatsapp": f.contact.whatsapp,
        "auth_email": f.contact.email,
        "place_and_date": place_and_date(f.city.as_deref(), f.state.as_deref(), generated_at),
        "generated_at": generated_at.to_document_display(),
        "version": version,
        "signature": signature_b64,
        "signature_mime": signature_mime,
        "has_signature": signature.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{EntityFields, Partner};

    fn acme() -> BusinessEntity {
        let mut fields = EntityFields::named("Acme");
        fields.tax_id = Some("12345678000190".into());
        fields.services.nfe = true;
        BusinessEntity::register(fields, vec![Partner::new("Ana", "111")]).unwrap()
    }

    #[test]
    fn missing_text_renders_empty() {
        let data = build_render_data(&acme(), 1, None, Timestamp::now());
        assert_eq!(data["city"], "");
        assert_eq!(data["employee_count"], "");
        assert_eq!(data["fantasy_name"], "Acme");
    }

    #[test]
    fn flags_and_partners_are_exposed() {
        let data = build_render_data(&acme(), 2, None, Timestamp::now());
        assert_eq!(data["svc_nfe"], true);
        assert_eq!(data["svc_spc"], false);
        assert_eq!(data["partners"][0]["name"], "Ana");
        assert_eq!(data["version"], 2);
    }

    #[test]
    fn signature_is_base64_with_mime() {
        let sig = EmbeddedSignature {
            format: ImageFormat::Png,
            bytes: b"sig",
        };
        let data = build_render_data(&acme(), 1, Some(sig), Timestamp::now());
        assert_eq!(data["signature"], "c2ln");
        assert_eq!(data["signature_mime"], "image/png");
    }

    #[test]
    fn no_signature_is_null() {
        let data = build_render_data(&acme(), 1, None, Timestamp::now());
        assert!(data["signature"].is_null());
        assert_eq!(data["has_signature"], false);
    }

    #[test]
    fn place_and_date_combines_city_state_and_date() {
        let generated_at: Timestamp = serde_json::from_str("\"2024-03-09T12:00:00Z\"").unwrap();
        let mut entity = acme();

        let data = build_render_data(&entity, 1, None, generated_at);
        assert_eq!(data["place_and_date"], "09/03/2024");

        entity.fields.city = Some("Curitiba".into());
        entity.fields.state = Some("PR".into());
        let data = build_render_data(&entity, 1, None, generated_at);
        assert_eq!(data["place_and_date"], "Curitiba/PR, 09/03/2024");
    }
}
