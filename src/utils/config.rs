use std::env;
use std::time::Duration;

use crate::pricing::CurrencyFormat;
use crate::store::{StoreSettings, DEFAULT_LOW_STOCK_THRESHOLD};

#[derive(Debug, Clone)]
pub struct Config {
    pub store_name: String,
    pub currency_code: String,
    pub log_level: String,
    pub environment: String,
    pub simulated_latency_ms: u64,
    pub low_stock_threshold: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config {
            store_name: env::var("POS_STORE_NAME").unwrap_or("POS Terminal".to_string()),
            currency_code: env::var("POS_CURRENCY")
                .unwrap_or("VND".to_string())
                .to_uppercase(),
            log_level: env::var("LOG_LEVEL").unwrap_or("info".to_string()),
            environment: env::var("APP_ENV").unwrap_or("development".to_string()),
            simulated_latency_ms: env::var("SIMULATED_LATENCY_MS")
                .unwrap_or("300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SIMULATED_LATENCY_MS must be a whole number"))?,
            low_stock_threshold: env::var("LOW_STOCK_THRESHOLD")
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("LOW_STOCK_THRESHOLD must be a whole number"))?,
        };

        tracing::info!("Config: successfully loaded for {} environment", config.environment);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_name.trim().is_empty() {
            return Err(anyhow::anyhow!("POS_STORE_NAME must not be empty"));
        }

        if CurrencyFormat::from_code(&self.currency_code).is_none() {
            return Err(anyhow::anyhow!(
                "POS_CURRENCY must be VND or USD, got '{}'",
                self.currency_code
            ));
        }

        if self.is_production() && self.simulated_latency_ms > 0 {
            tracing::warn!("SIMULATED_LATENCY_MS is set in production");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat::from_code(&self.currency_code).unwrap_or_default()
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            store_name: self.store_name.clone(),
            low_stock_threshold: self.low_stock_threshold,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_name: "POS Terminal".to_string(),
            currency_code: "VND".to_string(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
            simulated_latency_ms: 0,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}
