use crate::domain::error::DomainError;

pub const DEFAULT_DB_PATH: &str = "./pipescore.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_API_VERSION: &str = "v61.0";

/// Two years of closed deals feed the profiles by default.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 730;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file for score run history (PIPESCORE_DB)
    pub db_path: String,
    /// tracing filter directive (PIPESCORE_LOG), e.g. "info" or "pipescore=debug"
    pub log_level: String,
    /// Days of closed-deal history when no --since is given (PIPESCORE_LOOKBACK_DAYS)
    pub lookback_days: i64,
    /// Present only when SF_INSTANCE_URL and SF_ACCESS_TOKEN are both set.
    pub salesforce: Option<SalesforceConfig>,
}

#[derive(Debug, Clone)]
pub struct SalesforceConfig {
    /// e.g. https://mycompany.my.salesforce.com (SF_INSTANCE_URL)
    pub instance_url: String,
    /// Pre-issued OAuth bearer token (SF_ACCESS_TOKEN)
    pub access_token: String,
    /// REST API version segment (SF_API_VERSION)
    pub api_version: String,
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        let lookback_days = match std::env::var("PIPESCORE_LOOKBACK_DAYS") {
            Ok(v) => v.parse::<i64>().ok().filter(|d| *d > 0).ok_or_else(|| {
                DomainError::Config(format!(
                    "PIPESCORE_LOOKBACK_DAYS must be a positive number of days, got '{v}'"
                ))
            })?,
            Err(_) => DEFAULT_LOOKBACK_DAYS,
        };

        let salesforce = match (
            std::env::var("SF_INSTANCE_URL").ok(),
            std::env::var("SF_ACCESS_TOKEN").ok(),
        ) {
            (Some(instance_url), Some(access_token)) => Some(SalesforceConfig {
                instance_url,
                access_token,
                api_version: std::env::var("SF_API_VERSION")
                    .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            db_path: std::env::var("PIPESCORE_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            log_level: std::env::var("PIPESCORE_LOG")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            lookback_days,
            salesforce,
        })
    }

    pub fn require_salesforce(&self) -> Result<&SalesforceConfig, DomainError> {
        self.salesforce.as_ref().ok_or_else(|| {
            DomainError::Config(
                "Missing Salesforce configuration. Set SF_INSTANCE_URL and SF_ACCESS_TOKEN, or pass --input with a JSON snapshot".to_string(),
            )
        })
    }
}
