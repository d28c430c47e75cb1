use serde::{Deserialize, Serialize};

use crate::error::TtsError;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "ap-beijing";

/// Credentials and account settings for the TTS client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tencent Cloud secret id.
    pub secret_id: String,
    /// Tencent Cloud secret key.
    pub secret_key: String,
    /// TRTC SDK application id.
    pub sdk_app_id: i64,
    /// Tencent Cloud region. Defaults to `ap-beijing`; the TTS API itself
    /// does not require one.
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Config {
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        sdk_app_id: i64,
    ) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            sdk_app_id,
            region: default_region(),
        }
    }

    /// Validates credentials and fills the region default.
    pub fn validate(&mut self) -> Result<(), TtsError> {
        if self.secret_id.is_empty() {
            return Err(TtsError::InvalidConfig("secret_id is required".to_string()));
        }
        if self.secret_key.is_empty() {
            return Err(TtsError::InvalidConfig("secret_key is required".to_string()));
        }
        if self.sdk_app_id <= 0 {
            return Err(TtsError::InvalidConfig(
                "sdk_app_id must be positive".to_string(),
            ));
        }
        if self.region.is_empty() {
            self.region = default_region();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let mut config = Config::new("id", "key", 1400000000);
        assert!(config.validate().is_ok());
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_missing_secret_id() {
        let mut config = Config::new("", "key", 1);
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "InvalidConfig");
    }

    #[test]
    fn test_missing_secret_key() {
        let mut config = Config::new("id", "", 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_app_id() {
        let mut config = Config::new("id", "key", 0);
        assert!(config.validate().is_err());

        let mut config = Config::new("id", "key", -5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_region_falls_back_to_default() {
        let mut config = Config::new("id", "key", 1);
        config.region = String::new();
        config.validate().unwrap();
        assert_eq!(config.region, DEFAULT_REGION);
    }
}
