//! Catalog configuration loaded from the data/ directory.
//!
//! Catalogs are file-defined but store-served: the runner seeds them into
//! SQLite at startup, and the decision pipeline only ever reads products
//! through the store. Changing a catalog file therefore needs a reseed,
//! which matches how the upstream product teams ship catalog updates.

use crate::{
    client::ClientRecord,
    eligibility::{EligibilityRules, ProductRecord},
    error::EngineResult,
    insurance::{InsuranceCategoryRecord, InsuranceProductRecord},
    store::EngineStore,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct ProductCatalogFile {
    products: Vec<ProductRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct InsuranceCatalogFile {
    categories: Vec<InsuranceCategoryRecord>,
    products: Vec<InsuranceProductRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeedClientsFile {
    clients: Vec<ClientRecord>,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub products: Vec<ProductRecord>,
    pub insurance_categories: Vec<InsuranceCategoryRecord>,
    pub insurance_products: Vec<InsuranceProductRecord>,
    pub seed_clients: Vec<ClientRecord>,
}

impl EngineConfig {
    /// Load from the data/ directory. In tests, use default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let product_path = format!("{data_dir}/products/product_catalog.json");
        let product_content = std::fs::read_to_string(&product_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {product_path}: {e}"))?;
        let product_file: ProductCatalogFile = serde_json::from_str(&product_content)?;

        let insurance_path = format!("{data_dir}/insurance/insurance_catalog.json");
        let insurance_content = std::fs::read_to_string(&insurance_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {insurance_path}: {e}"))?;
        let insurance_file: InsuranceCatalogFile = serde_json::from_str(&insurance_content)?;

        let clients_path = format!("{data_dir}/clients/seed_clients.json");
        let clients_content = std::fs::read_to_string(&clients_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {clients_path}: {e}"))?;
        let clients_file: SeedClientsFile = serde_json::from_str(&clients_content)?;

        let mut config = Self {
            products: product_file.products,
            insurance_categories: insurance_file.categories,
            insurance_products: insurance_file.products,
            seed_clients: clients_file.clients,
        };
        config.assign_positions();
        Ok(config)
    }

    /// Catalog files carry no explicit ordering column; file order IS the
    /// catalog order the ranking tie-break depends on.
    fn assign_positions(&mut self) {
        for (i, p) in self.products.iter_mut().enumerate() {
            p.position = i as i64;
        }
        for (i, p) in self.insurance_products.iter_mut().enumerate() {
            p.position = i as i64;
        }
    }

    /// Insert catalog rows into the store. Run once against an empty
    /// database.
    pub fn seed_catalog(&self, store: &EngineStore) -> EngineResult<()> {
        for p in &self.products {
            store.insert_product(p)?;
        }
        for c in &self.insurance_categories {
            store.insert_insurance_category(c)?;
        }
        for p in &self.insurance_products {
            store.insert_insurance_product(p)?;
        }
        Ok(())
    }

    /// Insert demo client rows into the store.
    pub fn seed_clients(&self, store: &EngineStore) -> EngineResult<()> {
        for c in &self.seed_clients {
            store.insert_client(c)?;
        }
        Ok(())
    }

    /// Small in-code catalog for tests.
    pub fn default_test() -> Self {
        let rules = |min: i64, credit: bool, employment: bool| {
            Some(EligibilityRules {
                min_credit_score: min,
                credit_check: credit,
                employment_required: employment,
            })
        };
        let product = |code: &str,
                       name: &str,
                       option: i64,
                       benefits: &[&str],
                       r: Option<EligibilityRules>| ProductRecord {
            product_code: code.into(),
            product_name: name.into(),
            option_id: option,
            benefits: benefits.iter().map(|b| b.to_string()).collect(),
            eligibility_rules: r,
            position: 0,
        };

        let mut config = Self {
            products: vec![
                product(
                    "ACC-EASY",
                    "Easy Zero Account",
                    1,
                    &["No monthly account fee", "Free card swipes"],
                    None,
                ),
                product(
                    "ACC-ASPIRE",
                    "Aspire Account",
                    1,
                    &[
                        "Linked savings pocket",
                        "Rewards on groceries",
                        "Free eWallet transfers",
                    ],
                    rules(580, true, false),
                ),
                product(
                    "ACC-PREM",
                    "Premier Account",
                    1,
                    &[
                        "Dedicated banker",
                        "Airport lounge visits",
                        "Premium rewards tier",
                    ],
                    rules(660, true, true),
                ),
                product(
                    "CON-SIM",
                    "Connect Prepaid SIM",
                    2,
                    &["Pay-as-you-go data", "Free SIM"],
                    None,
                ),
                product(
                    "CON-HOME",
                    "Connect Home Fibre",
                    2,
                    &["Uncapped fibre", "Free router", "Month-to-month contract"],
                    rules(620, true, true),
                ),
                product(
                    "LOAN-PERS",
                    "Personal Loan",
                    4,
                    &[
                        "Fixed repayments",
                        "Same-day payout",
                        "No early settlement penalty",
                    ],
                    rules(600, true, true),
                ),
                product(
                    "LOAN-REVOLVE",
                    "Revolving Loan",
                    4,
                    &["Re-draw repaid funds", "Interest on used balance only"],
                    rules(640, true, true),
                ),
                product(
                    "CARD-GOLD",
                    "Gold Credit Card",
                    4,
                    &["55 days interest free", "Travel insurance"],
                    rules(650, true, false),
                ),
            ],
            insurance_categories: vec![
                InsuranceCategoryRecord {
                    id: "cat-car".into(),
                    name: "Car Insurance".into(),
                },
                InsuranceCategoryRecord {
                    id: "cat-home".into(),
                    name: "Home Insurance".into(),
                },
                InsuranceCategoryRecord {
                    id: "cat-life".into(),
                    name: "Life Insurance".into(),
                },
                InsuranceCategoryRecord {
                    id: "cat-health".into(),
                    name: "Health Insurance".into(),
                },
            ],
            insurance_products: vec![
                InsuranceProductRecord {
                    id: "ins-car-comp".into(),
                    category_id: "cat-car".into(),
                    name: "Comprehensive Car Cover".into(),
                    description: Some("Accident, theft and third-party cover".into()),
                    active: true,
                    position: 0,
                },
                InsuranceProductRecord {
                    id: "ins-home-contents".into(),
                    category_id: "cat-home".into(),
                    name: "Home Contents Cover".into(),
                    description: Some("Household contents insured against theft and fire".into()),
                    active: true,
                    position: 0,
                },
                InsuranceProductRecord {
                    id: "ins-life-core".into(),
                    category_id: "cat-life".into(),
                    name: "Life Cover Plan".into(),
                    description: Some("Lump-sum payout with fixed premiums".into()),
                    active: true,
                    position: 0,
                },
                InsuranceProductRecord {
                    id: "ins-health-gap".into(),
                    category_id: "cat-health".into(),
                    name: "Medical Gap Cover".into(),
                    description: Some("Covers medical scheme rate shortfalls".into()),
                    active: true,
                    position: 0,
                },
                InsuranceProductRecord {
                    id: "ins-funeral-legacy".into(),
                    category_id: "cat-life".into(),
                    name: "Legacy Funeral Plan".into(),
                    description: Some("Discontinued funeral benefit".into()),
                    active: false,
                    position: 0,
                },
            ],
            seed_clients: Vec::new(),
        };
        config.assign_positions();
        config
    }
}
