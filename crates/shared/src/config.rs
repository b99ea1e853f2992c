//! Engine configuration management.

use serde::Deserialize;

use crate::types::AccountId;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Ledger configuration.
    pub ledger: LedgerConfig,
    /// Behavior when a sale exceeds the linked order's remaining stock.
    #[serde(default)]
    pub stock_policy: StockPolicy,
}

/// Ledger configuration: the three accounts every sale distributes into.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Account receiving the cost-recovery share.
    pub cost_account: AccountId,
    /// Account receiving the freight share.
    pub freight_account: AccountId,
    /// Account receiving the profit share.
    pub profit_account: AccountId,
}

/// Policy applied when a sale quantity exceeds the remaining stock of
/// its linked purchase order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Reject the sale with a conflict error.
    #[default]
    Reject,
    /// Record the sale without touching stock.
    Skip,
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Reads `config/default`, then `config/{RUN_MODE}`, then
    /// `REPARTO`-prefixed environment variables. A `.env` file is
    /// honored if present.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("REPARTO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
