use super::EngineStore;
use crate::{bureau::BureauProfileRecord, error::EngineResult};
use rusqlite::{params, OptionalExtension};

impl EngineStore {
    // ── Bureau profiles ───────────────────────────────────────────

    pub fn insert_bureau_profile(&self, p: &BureauProfileRecord) -> EngineResult<()> {
        self.conn().execute(
            "INSERT INTO bureau_profiles (
                user_id, bureau, enquiry_reason, enquiry_date, enquiry_type,
                marital_status, gender, employment_status, fraud_id_verified,
                fraud_deceased_status, fraud_found_on_database,
                presage_score, nlr_score, risk_band, raw_payload
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                &p.user_id,
                &p.bureau,
                &p.enquiry_reason,
                &p.enquiry_date,
                &p.enquiry_type,
                &p.marital_status,
                &p.gender,
                &p.employment_status,
                p.fraud_id_verified,
                &p.fraud_deceased_status,
                p.fraud_found_on_database,
                p.presage_score,
                p.nlr_score,
                &p.risk_band,
                &p.raw_payload,
            ],
        )?;
        Ok(())
    }

    pub fn get_bureau_profile(
        &self,
        client_id: &str,
    ) -> EngineResult<Option<BureauProfileRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT user_id, bureau, enquiry_reason, enquiry_date, enquiry_type,
                    marital_status, gender, employment_status, fraud_id_verified,
                    fraud_deceased_status, fraud_found_on_database,
                    presage_score, nlr_score, risk_band, raw_payload
             FROM bureau_profiles WHERE user_id = ?1",
        )?;
        let row = stmt
            .query_row(params![client_id], |r| {
                Ok(BureauProfileRecord {
                    user_id: r.get(0)?,
                    bureau: r.get(1)?,
                    enquiry_reason: r.get(2)?,
                    enquiry_date: r.get(3)?,
                    enquiry_type: r.get(4)?,
                    marital_status: r.get(5)?,
                    gender: r.get(6)?,
                    employment_status: r.get(7)?,
                    fraud_id_verified: r.get(8)?,
                    fraud_deceased_status: r.get(9)?,
                    fraud_found_on_database: r.get(10)?,
                    presage_score: r.get(11)?,
                    nlr_score: r.get(12)?,
                    risk_band: r.get(13)?,
                    raw_payload: r.get(14)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    /// Count bureau profile rows (test helper).
    pub fn bureau_profile_count(&self) -> EngineResult<i64> {
        let n: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM bureau_profiles", [], |r| r.get(0))?;
        Ok(n)
    }
}
