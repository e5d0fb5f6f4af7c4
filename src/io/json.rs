use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    models::{product::Product, sale::Sale},
    store::AppState,
};

/// Catalog and sales history written by `catalog export --format json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub store: String,
    pub exported_at: DateTime<Utc>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
}

impl ExportBundle {
    pub fn from_state(state: &AppState, exported_at: DateTime<Utc>) -> Self {
        Self {
            store: state.settings.store_name.clone(),
            exported_at,
            products: state.products.clone(),
            sales: state.sales.clone(),
        }
    }
}

pub fn to_json(bundle: &ExportBundle) -> serde_json::Result<String> {
    serde_json::to_string_pretty(bundle)
}

pub async fn write_bundle(path: impl AsRef<Path>, bundle: &ExportBundle) -> anyhow::Result<()> {
    let text = to_json(bundle)?;
    tokio::fs::write(path.as_ref(), text).await?;
    info!(
        "Exported {} products and {} sales to {}",
        bundle.products.len(),
        bundle.sales.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub async fn read_bundle(path: impl AsRef<Path>) -> anyhow::Result<ExportBundle> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{seed_state, StoreSettings};

    #[tokio::test]
    async fn test_bundle_file_round_trip() {
        let state = seed_state(StoreSettings::default(), Utc::now()).unwrap();
        let bundle = ExportBundle::from_state(&state, Utc::now());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        write_bundle(&path, &bundle).await.unwrap();

        let loaded = read_bundle(&path).await.unwrap();
        assert_eq!(loaded.store, "POS Terminal");
        assert_eq!(loaded.products.len(), state.products.len());
        assert_eq!(loaded.sales.len(), state.sales.len());
        assert_eq!(loaded.sales[0].payment, state.sales[0].payment);
    }

    #[test]
    fn test_payment_is_tagged() {
        let json = serde_json::to_string(&crate::models::sale::PaymentMethod::Cash {
            tendered: 50_000.0,
        })
        .unwrap();
        assert_eq!(json, r#"{"method":"cash","tendered":50000.0}"#);
    }
}
