//! PostgreSQL implementation of EntityRepository.
//!
//! Each mutating call runs in one transaction covering the `companies` row,
//! the `company_partners` rows and one `audit_logs` row.

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::entity::{
    AuditAction, BusinessEntity, ContactConsent, EntityFields, EntityPatch, EntitySummary,
    Partner, ServiceFlags, COMPANY_ENTITY_TYPE,
};
use crate::domain::foundation::{DomainError, EntityId, ErrorCode, Timestamp, UserId};
use crate::ports::EntityRepository;

/// Attribute columns, in bind order.
const FIELD_COLUMNS: &[&str] = &[
    "fantasy_name",
    "corporate_name",
    "tax_id",
    "state_registration",
    "address",
    "zip",
    "city",
    "state",
    "phone",
    "mobile",
    "whatsapp",
    "email",
    "instagram",
    "business_activity",
    "foundation_date",
    "employee_count",
    "sector",
    "accounting_firm",
    "referral",
    "notes",
    "svc_spc",
    "svc_nfe",
    "svc_nfce",
    "svc_mdfe",
    "svc_cte",
    "svc_cfe",
    "services_notes",
    "plan_type",
    "plan_value",
    "due_date",
    "auth_site",
    "auth_whatsapp",
    "auth_email",
];

fn insert_sql() -> String {
    let n = FIELD_COLUMNS.len();
    let placeholders: Vec<String> = (2..=n + 1).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO companies (id, {}, signature_ref, created_at, updated_at) \
         VALUES ($1, {}, ${}, ${}, ${})",
        FIELD_COLUMNS.join(", "),
        placeholders.join(", "),
        n + 2,
        n + 3,
        n + 4
    )
}

fn update_sql() -> String {
    let n = FIELD_COLUMNS.len();
    let sets: Vec<String> = FIELD_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = ${}", col, i + 2))
        .collect();
    format!(
        "UPDATE companies SET {}, updated_at = ${} WHERE id = $1",
        sets.join(", "),
        n + 2
    )
}

fn select_sql(filter: &str) -> String {
    format!(
        "SELECT id, {}, signature_ref, created_at, updated_at FROM companies {}",
        FIELD_COLUMNS.join(", "),
        filter
    )
}

/// Binds the attribute columns in `FIELD_COLUMNS` order.
fn bind_fields<'q>(
    query: Query<'q, Postgres, PgArguments>,
    f: &'q EntityFields,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(&f.fantasy_name)
        .bind(&f.corporate_name)
        .bind(&f.tax_id)
        .bind(&f.state_registration)
        .bind(&f.address)
        .bind(&f.zip)
        .bind(&f.city)
        .bind(&f.state)
        .bind(&f.phone)
        .bind(&f.mobile)
        .bind(&f.whatsapp)
        .bind(&f.email)
        .bind(&f.instagram)
        .bind(&f.business_activity)
        .bind(&f.foundation_date)
        .bind(f.employee_count)
        .bind(&f.sector)
        .bind(&f.accounting_firm)
        .bind(&f.referral)
        .bind(&f.notes)
        .bind(f.services.spc)
        .bind(f.services.nfe)
        .bind(f.services.nfce)
        .bind(f.services.mdfe)
        .bind(f.services.cte)
        .bind(f.services.cfe)
        .bind(&f.services_notes)
        .bind(&f.plan_type)
        .bind(&f.plan_value)
        .bind(&f.due_date)
        .bind(f.contact.site)
        .bind(f.contact.whatsapp)
        .bind(f.contact.email)
}

fn row_to_fields(row: &PgRow) -> Result<EntityFields, sqlx::Error> {
    Ok(EntityFields {
        fantasy_name: row.try_get("fantasy_name")?,
        corporate_name: row.try_get("corporate_name")?,
        tax_id: row.try_get("tax_id")?,
        state_registration: row.try_get("state_registration")?,
        address: row.try_get("address")?,
        zip: row.try_get("zip")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        phone: row.try_get("phone")?,
        mobile: row.try_get("mobile")?,
        whatsapp: row.try_get("whatsapp")?,
        email: row.try_get("email")?,
        instagram: row.try_get("instagram")?,
        business_activity: row.try_get("business_activity")?,
        foundation_date: row.try_get("foundation_date")?,
        employee_count: row.try_get("employee_count")?,
        sector: row.try_get("sector")?,
        accounting_firm: row.try_get("accounting_firm")?,
        referral: row.try_get("referral")?,
        notes: row.try_get("notes")?,
        services: ServiceFlags {
            spc: row.try_get("svc_spc")?,
            nfe: row.try_get("svc_nfe")?,
            nfce: row.try_get("svc_nfce")?,
            mdfe: row.try_get("svc_mdfe")?,
            cte: row.try_get("svc_cte")?,
            cfe: row.try_get("svc_cfe")?,
        },
        services_notes: row.try_get("services_notes")?,
        plan_type: row.try_get("plan_type")?,
        plan_value: row.try_get("plan_value")?,
        due_date: row.try_get("due_date")?,
        contact: ContactConsent {
            site: row.try_get("auth_site")?,
            whatsapp: row.try_get("auth_whatsapp")?,
            email: row.try_get("auth_email")?,
        },
    })
}

fn row_to_entity(row: &PgRow, partners: Vec<Partner>) -> Result<BusinessEntity, DomainError> {
    let map = |e: sqlx::Error| DomainError::database("Failed to decode company row", e);

    let id: uuid::Uuid = row.try_get("id").map_err(map)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(map)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(map)?;

    Ok(BusinessEntity {
        id: EntityId::from_uuid(id),
        fields: row_to_fields(row).map_err(map)?,
        partners,
        signature_ref: row.try_get("signature_ref").map_err(map)?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

/// PostgreSQL implementation of the EntityRepository port.
#[derive(Clone)]
pub struct PostgresEntityRepository {
    pool: PgPool,
}

impl PostgresEntityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_partners(
        tx: &mut Transaction<'_, Postgres>,
        id: &EntityId,
        partners: &[Partner],
    ) -> Result<(), DomainError> {
        for (position, partner) in partners.iter().enumerate() {
            sqlx::query(
                "INSERT INTO company_partners (company_id, position, name, tax_id) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id.as_uuid())
            .bind(position as i32)
            .bind(&partner.name)
            .bind(&partner.tax_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to insert partner", e))?;
        }
        Ok(())
    }

    async fn insert_audit(
        tx: &mut Transaction<'_, Postgres>,
        id: &EntityId,
        action: AuditAction,
        actor: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO audit_logs (entity, entity_id, action, user_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(COMPANY_ENTITY_TYPE)
        .bind(id.as_uuid())
        .bind(action.as_str())
        .bind(actor.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::database("Failed to insert audit row", e))?;
        Ok(())
    }

    async fn load_partners<'e, E>(executor: E, id: &EntityId) -> Result<Vec<Partner>, DomainError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows = sqlx::query(
            "SELECT name, tax_id FROM company_partners WHERE company_id = $1 ORDER BY position",
        )
        .bind(id.as_uuid())
        .fetch_all(executor)
        .await
        .map_err(|e| DomainError::database("Failed to load partners", e))?;

        rows.iter()
            .map(|row| {
                Ok(Partner {
                    name: row.try_get("name")?,
                    tax_id: row.try_get("tax_id")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| DomainError::database("Failed to decode partner row", e))
    }
}

fn not_found(id: &EntityId) -> DomainError {
    DomainError::new(ErrorCode::EntityNotFound, format!("Entity {} not found", id))
        .with_detail("entity_id", id.to_string())
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    async fn create(&self, entity: &BusinessEntity, actor: &UserId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let sql = insert_sql();
        let query = sqlx::query(&sql).bind(entity.id.as_uuid());
        bind_fields(query, &entity.fields)
            .bind(&entity.signature_ref)
            .bind(entity.created_at.as_datetime())
            .bind(entity.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to insert company", e))?;

        Self::insert_partners(&mut tx, &entity.id, &entity.partners).await?;
        Self::insert_audit(&mut tx, &entity.id, AuditAction::Create, actor).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn update(
        &self,
        id: &EntityId,
        patch: &EntityPatch,
        actor: &UserId,
    ) -> Result<BusinessEntity, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let row = sqlx::query(&select_sql("WHERE id = $1 FOR UPDATE"))
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to load company", e))?
            .ok_or_else(|| not_found(id))?;

        let partners = Self::load_partners(&mut *tx, id).await?;
        let mut entity = row_to_entity(&row, partners)?;
        entity.apply_patch(patch)?;

        let sql = update_sql();
        let query = sqlx::query(&sql).bind(id.as_uuid());
        bind_fields(query, &entity.fields)
            .bind(entity.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to update company", e))?;

        if patch.partners.is_some() {
            sqlx::query("DELETE FROM company_partners WHERE company_id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database("Failed to delete partners", e))?;
            Self::insert_partners(&mut tx, id, &entity.partners).await?;
        }

        Self::insert_audit(&mut tx, id, AuditAction::Update, actor).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(entity)
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<BusinessEntity>, DomainError> {
        let row = sqlx::query(&select_sql("WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load company", e))?;

        match row {
            Some(row) => {
                let partners = Self::load_partners(&self.pool, id).await?;
                Ok(Some(row_to_entity(&row, partners)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<EntitySummary>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, fantasy_name, tax_id, city, state, updated_at \
             FROM companies ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list companies", e))?;

        rows.iter()
            .map(|row| {
                let id: uuid::Uuid = row.try_get("id")?;
                let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at")?;
                Ok(EntitySummary {
                    id: EntityId::from_uuid(id),
                    fantasy_name: row.try_get("fantasy_name")?,
                    tax_id: row.try_get("tax_id")?,
                    city: row.try_get("city")?,
                    state: row.try_get("state")?,
                    updated_at: Timestamp::from_datetime(updated_at),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| DomainError::database("Failed to decode company summary", e))
    }

    async fn record_signature(
        &self,
        id: &EntityId,
        signature_ref: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE companies SET signature_ref = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(signature_ref)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to record signature", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
