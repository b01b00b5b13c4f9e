//! Postgres gateway for section data.
//!
//! # Tables
//!
//! - `page_section` - Live sections of storefront pages
//! - `section_template` - Named template headers
//! - `template_section` - Sections belonging to templates
//!
//! Section kinds, page types, and locations are stored as text keys;
//! settings are stored as `JSONB`. Rows with a kind this build does not
//! know are skipped on load instead of failing the page.
//!
//! # Migrations
//!
//! Migrations live in `crates/engine/migrations/` and run via
//! [`run_migrations`] at service startup.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use pagecraft_core::{MerchantId, PageType, Section, SectionId, TemplateId};
use secrecy::ExposeSecret;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use super::{SectionGateway, SectionTemplate, section_from_stored};
use crate::error::GatewayError;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the engine's database migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Gateway backed by `PostgreSQL`.
pub struct PostgresGateway {
    pool: PgPool,
}

impl PostgresGateway {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn template_sections(&self, template: TemplateId) -> Result<Vec<Section>, GatewayError> {
        let rows = sqlx::query(
            r"
            SELECT id, kind, position, visible, settings, location
            FROM template_section
            WHERE template_id = $1
            ORDER BY position
            ",
        )
        .bind(template.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        collect_sections(&rows)
    }
}

#[async_trait]
impl SectionGateway for PostgresGateway {
    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        merchant: MerchantId,
        page_type: PageType,
    ) -> Result<Vec<Section>, GatewayError> {
        let rows = sqlx::query(
            r"
            SELECT id, kind, position, visible, settings, location
            FROM page_section
            WHERE merchant_id = $1 AND page_type = $2
            ORDER BY position
            ",
        )
        .bind(merchant.as_uuid())
        .bind(page_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        collect_sections(&rows)
    }

    #[instrument(skip(self, sections), fields(count = sections.len()))]
    async fn replace_page(
        &self,
        merchant: MerchantId,
        page_type: PageType,
        sections: &[Section],
    ) -> Result<(), GatewayError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM page_section WHERE merchant_id = $1 AND page_type = $2")
            .bind(merchant.as_uuid())
            .bind(page_type.as_str())
            .execute(&mut *tx)
            .await?;

        for section in sections {
            sqlx::query(
                r"
                INSERT INTO page_section
                    (id, merchant_id, page_type, kind, position, visible, settings, location)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(section.id.as_uuid())
            .bind(merchant.as_uuid())
            .bind(page_type.as_str())
            .bind(section.kind.as_key())
            .bind(position_column(section.position))
            .bind(section.visible)
            .bind(section.settings.as_value())
            .bind(section.location.map(|location| location.as_str()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
    ) -> Result<Option<SectionTemplate>, GatewayError> {
        let Some(row) =
            sqlx::query("SELECT name FROM section_template WHERE id = $1 AND merchant_id = $2")
                .bind(template.as_uuid())
                .bind(merchant.as_uuid())
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        Ok(Some(SectionTemplate {
            id: template,
            name: row.try_get("name")?,
            sections: self.template_sections(template).await?,
        }))
    }

    #[instrument(skip(self))]
    async fn list_templates(
        &self,
        merchant: MerchantId,
    ) -> Result<Vec<SectionTemplate>, GatewayError> {
        let template_rows =
            sqlx::query("SELECT id, name FROM section_template WHERE merchant_id = $1 ORDER BY name")
                .bind(merchant.as_uuid())
                .fetch_all(&self.pool)
                .await?;

        let section_rows = sqlx::query(
            r"
            SELECT ts.template_id, ts.id, ts.kind, ts.position, ts.visible,
                   ts.settings, ts.location
            FROM template_section ts
            JOIN section_template st ON st.id = ts.template_id
            WHERE st.merchant_id = $1
            ORDER BY ts.template_id, ts.position
            ",
        )
        .bind(merchant.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let mut sections_by_template: HashMap<Uuid, Vec<Section>> = HashMap::new();
        for row in &section_rows {
            let template_id: Uuid = row.try_get("template_id")?;
            if let Some(section) = section_from_row(row)? {
                sections_by_template.entry(template_id).or_default().push(section);
            }
        }

        let mut templates = Vec::with_capacity(template_rows.len());
        for row in &template_rows {
            let id: Uuid = row.try_get("id")?;
            templates.push(SectionTemplate {
                id: TemplateId::from_uuid(id),
                name: row.try_get("name")?,
                sections: sections_by_template.remove(&id).unwrap_or_default(),
            });
        }
        Ok(templates)
    }

    #[instrument(skip(self))]
    async fn create_template(
        &self,
        merchant: MerchantId,
        name: &str,
    ) -> Result<SectionTemplate, GatewayError> {
        let id = TemplateId::generate();
        sqlx::query("INSERT INTO section_template (id, merchant_id, name) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(merchant.as_uuid())
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(SectionTemplate {
            id,
            name: name.to_owned(),
            sections: Vec::new(),
        })
    }

    #[instrument(skip(self, sections), fields(count = sections.len()))]
    async fn replace_template_sections(
        &self,
        merchant: MerchantId,
        template: TemplateId,
        sections: &[Section],
    ) -> Result<(), GatewayError> {
        let mut tx = self.pool.begin().await?;

        let owned =
            sqlx::query("SELECT 1 FROM section_template WHERE id = $1 AND merchant_id = $2")
                .bind(template.as_uuid())
                .bind(merchant.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Err(GatewayError::NotFound);
        }

        sqlx::query("DELETE FROM template_section WHERE template_id = $1")
            .bind(template.as_uuid())
            .execute(&mut *tx)
            .await?;

        for section in sections {
            sqlx::query(
                r"
                INSERT INTO template_section
                    (id, template_id, kind, position, visible, settings, location)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(section.id.as_uuid())
            .bind(template.as_uuid())
            .bind(section.kind.as_key())
            .bind(position_column(section.position))
            .bind(section.visible)
            .bind(section.settings.as_value())
            .bind(section.location.map(|location| location.as_str()))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE section_template SET updated_at = NOW() WHERE id = $1")
            .bind(template.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self, name))]
    async fn rename_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
        name: &str,
    ) -> Result<(), GatewayError> {
        let result = sqlx::query(
            r"
            UPDATE section_template
            SET name = $1, updated_at = NOW()
            WHERE id = $2 AND merchant_id = $3
            ",
        )
        .bind(name)
        .bind(template.as_uuid())
        .bind(merchant.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_template(
        &self,
        merchant: MerchantId,
        template: TemplateId,
    ) -> Result<(), GatewayError> {
        let result =
            sqlx::query("DELETE FROM section_template WHERE id = $1 AND merchant_id = $2")
                .bind(template.as_uuid())
                .bind(merchant.as_uuid())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound);
        }
        Ok(())
    }
}

fn collect_sections(rows: &[PgRow]) -> Result<Vec<Section>, GatewayError> {
    let mut sections = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(section) = section_from_row(row)? {
            sections.push(section);
        }
    }
    Ok(sections)
}

/// Map one stored row to a section via [`section_from_stored`].
fn section_from_row(row: &PgRow) -> Result<Option<Section>, GatewayError> {
    let id: Uuid = row.try_get("id")?;
    let kind: String = row.try_get("kind")?;
    let position: i32 = row.try_get("position")?;
    let visible: bool = row.try_get("visible")?;
    let settings: serde_json::Value = row.try_get("settings")?;
    let location: Option<String> = row.try_get("location")?;
    section_from_stored(
        SectionId::from_uuid(id),
        &kind,
        position,
        visible,
        settings,
        location.as_deref(),
    )
}

fn position_column(position: u32) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}
