use super::EngineStore;
use crate::{
    eligibility::ProductRecord,
    error::EngineResult,
    insurance::{InsuranceCategoryRecord, InsuranceProductRecord},
    interest::ProductOption,
};
use rusqlite::params;
use std::collections::HashMap;

impl EngineStore {
    // ── Product catalog ───────────────────────────────────────────

    pub fn insert_product(&self, p: &ProductRecord) -> EngineResult<()> {
        let benefits = serde_json::to_string(&p.benefits)?;
        let rules = p
            .eligibility_rules
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn().execute(
            "INSERT INTO products (
                product_code, product_name, option_id, benefits,
                eligibility_rules, position
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &p.product_code,
                &p.product_name,
                p.option_id,
                benefits,
                rules,
                p.position,
            ],
        )?;
        Ok(())
    }

    /// Catalog slice for one option, in catalog order. Eligibility and
    /// ranking both depend on that order being stable.
    pub fn products_for_option(&self, option: ProductOption) -> EngineResult<Vec<ProductRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT product_code, product_name, option_id, benefits,
                    eligibility_rules, position
             FROM products WHERE option_id = ?1 ORDER BY position ASC",
        )?;
        let raw = stmt
            .query_map(params![option.option_id()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut products = Vec::with_capacity(raw.len());
        for (code, name, option_id, benefits, rules, position) in raw {
            products.push(ProductRecord {
                product_code: code,
                product_name: name,
                option_id,
                benefits: serde_json::from_str(&benefits)?,
                eligibility_rules: rules.map(|r| serde_json::from_str(&r)).transpose()?,
                position,
            });
        }
        Ok(products)
    }

    pub fn product_count(&self) -> EngineResult<i64> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM products", [], |r| r.get(0))?;
        Ok(n)
    }

    // ── Insurance catalog ─────────────────────────────────────────

    pub fn insert_insurance_category(&self, c: &InsuranceCategoryRecord) -> EngineResult<()> {
        self.conn().execute(
            "INSERT INTO insurance_categories (id, name) VALUES (?1, ?2)",
            params![&c.id, &c.name],
        )?;
        Ok(())
    }

    pub fn insert_insurance_product(&self, p: &InsuranceProductRecord) -> EngineResult<()> {
        self.conn().execute(
            "INSERT INTO insurance_products (
                id, category_id, name, description, active, position
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &p.id,
                &p.category_id,
                &p.name,
                &p.description,
                p.active,
                p.position,
            ],
        )?;
        Ok(())
    }

    /// Active insurance products only, in catalog order.
    pub fn active_insurance_products(&self) -> EngineResult<Vec<InsuranceProductRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, category_id, name, description, active, position
             FROM insurance_products WHERE active = 1 ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(InsuranceProductRecord {
                id: row.get(0)?,
                category_id: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                active: row.get(4)?,
                position: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Category id → display name, for relevance scoring.
    pub fn insurance_category_names(&self) -> EngineResult<HashMap<String, String>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, name FROM insurance_categories")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect::<Result<HashMap<_, _>, _>>().map_err(Into::into)
    }
}
