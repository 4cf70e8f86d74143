use super::EngineStore;
use crate::{
    error::EngineResult,
    interest::ProductOption,
    recommendation::{CategorySlot, RecommendationRecord},
};
use rusqlite::{params, OptionalExtension};

const REC_COLUMNS: &str = "id, customer_id,
    account_rec_1_name, account_rec_1_reason, account_rec_2_name, account_rec_2_reason,
    connect_rec_1_name, connect_rec_1_reason, connect_rec_2_name, connect_rec_2_reason,
    insurance_rec_1_name, insurance_rec_1_reason, insurance_rec_2_name, insurance_rec_2_reason,
    loan_rec_1_name, loan_rec_1_reason, loan_rec_2_name, loan_rec_2_reason,
    enrichment_complete, generated_at";

impl EngineStore {
    // ── Recommendations ───────────────────────────────────────────

    pub fn get_recommendation(
        &self,
        client_id: &str,
    ) -> EngineResult<Option<RecommendationRecord>> {
        let sql =
            format!("SELECT {REC_COLUMNS} FROM recommendations WHERE customer_id = ?1");
        let mut stmt = self.conn().prepare(&sql)?;
        let row = stmt
            .query_row(params![client_id], map_recommendation_row)
            .optional()?;
        Ok(row)
    }

    pub fn insert_recommendation(&self, rec: &RecommendationRecord) -> EngineResult<()> {
        let sql = format!(
            "INSERT INTO recommendations ({REC_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
        );
        self.conn().execute(&sql, recommendation_params(rec).as_slice())?;
        Ok(())
    }

    /// Insert-or-merge keyed on the customer id: an existing row keeps its
    /// id and takes every field of `rec`; absent rows are inserted as-is.
    pub fn upsert_recommendation(&self, rec: &RecommendationRecord) -> EngineResult<()> {
        let updated = self.conn().execute(
            "UPDATE recommendations SET
                account_rec_1_name     = ?1,
                account_rec_1_reason   = ?2,
                account_rec_2_name     = ?3,
                account_rec_2_reason   = ?4,
                connect_rec_1_name     = ?5,
                connect_rec_1_reason   = ?6,
                connect_rec_2_name     = ?7,
                connect_rec_2_reason   = ?8,
                insurance_rec_1_name   = ?9,
                insurance_rec_1_reason = ?10,
                insurance_rec_2_name   = ?11,
                insurance_rec_2_reason = ?12,
                loan_rec_1_name        = ?13,
                loan_rec_1_reason      = ?14,
                loan_rec_2_name        = ?15,
                loan_rec_2_reason      = ?16,
                enrichment_complete    = ?17,
                generated_at           = ?18
             WHERE customer_id = ?19",
            params![
                &rec.accounts.best_name,
                &rec.accounts.best_reason,
                &rec.accounts.next_name,
                &rec.accounts.next_reason,
                &rec.connect.best_name,
                &rec.connect.best_reason,
                &rec.connect.next_name,
                &rec.connect.next_reason,
                &rec.insurance.best_name,
                &rec.insurance.best_reason,
                &rec.insurance.next_name,
                &rec.insurance.next_reason,
                &rec.loan.best_name,
                &rec.loan.best_reason,
                &rec.loan.next_name,
                &rec.loan.next_reason,
                rec.enrichment_complete,
                &rec.generated_at,
                &rec.customer_id,
            ],
        )?;
        if updated == 0 {
            self.insert_recommendation(rec)?;
        }
        Ok(())
    }

    /// Partial update of one option's four fields plus the timestamp.
    pub fn update_category_slot(
        &self,
        client_id: &str,
        option: ProductOption,
        slot: &CategorySlot,
        generated_at: &str,
    ) -> EngineResult<()> {
        let prefix = option.field_prefix();
        let sql = format!(
            "UPDATE recommendations SET
                {prefix}_rec_1_name   = ?1,
                {prefix}_rec_1_reason = ?2,
                {prefix}_rec_2_name   = ?3,
                {prefix}_rec_2_reason = ?4,
                generated_at          = ?5
             WHERE customer_id = ?6"
        );
        self.conn().execute(
            &sql,
            params![
                &slot.best_name,
                &slot.best_reason,
                &slot.next_name,
                &slot.next_reason,
                generated_at,
                client_id,
            ],
        )?;
        Ok(())
    }

    /// Count recommendation rows (test helper).
    pub fn recommendation_count(&self) -> EngineResult<i64> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM recommendations", [], |r| r.get(0))?;
        Ok(n)
    }
}

fn map_recommendation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecommendationRecord> {
    Ok(RecommendationRecord {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        accounts: CategorySlot {
            best_name: row.get(2)?,
            best_reason: row.get(3)?,
            next_name: row.get(4)?,
            next_reason: row.get(5)?,
        },
        connect: CategorySlot {
            best_name: row.get(6)?,
            best_reason: row.get(7)?,
            next_name: row.get(8)?,
            next_reason: row.get(9)?,
        },
        insurance: CategorySlot {
            best_name: row.get(10)?,
            best_reason: row.get(11)?,
            next_name: row.get(12)?,
            next_reason: row.get(13)?,
        },
        loan: CategorySlot {
            best_name: row.get(14)?,
            best_reason: row.get(15)?,
            next_name: row.get(16)?,
            next_reason: row.get(17)?,
        },
        enrichment_complete: row.get(18)?,
        generated_at: row.get(19)?,
    })
}

fn recommendation_params(rec: &RecommendationRecord) -> Vec<&dyn rusqlite::ToSql> {
    vec![
        &rec.id,
        &rec.customer_id,
        &rec.accounts.best_name,
        &rec.accounts.best_reason,
        &rec.accounts.next_name,
        &rec.accounts.next_reason,
        &rec.connect.best_name,
        &rec.connect.best_reason,
        &rec.connect.next_name,
        &rec.connect.next_reason,
        &rec.insurance.best_name,
        &rec.insurance.best_reason,
        &rec.insurance.next_name,
        &rec.insurance.next_reason,
        &rec.loan.best_name,
        &rec.loan.best_reason,
        &rec.loan.next_name,
        &rec.loan.next_reason,
        &rec.enrichment_complete,
        &rec.generated_at,
    ]
}
