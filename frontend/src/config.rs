use log::Level;

pub const DEFAULT_ENDPOINT: &str = "/classify_endpoint";
pub const DEFAULT_LOG_LEVEL: Level = Level::Info;

/// Settings baked in at build time through `CLASSIFY_ENDPOINT` and
/// `CLASSIFY_LOG_LEVEL`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoint: String,
    pub log_level: Level,
    // Collected here because the logger is not running yet while loading.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_values(option_env!("CLASSIFY_ENDPOINT"), option_env!("CLASSIFY_LOG_LEVEL"))
    }

    pub fn from_values(endpoint: Option<&str>, log_level: Option<&str>) -> Self {
        let mut warnings = Vec::new();

        let endpoint = match endpoint.map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            Some(_) => {
                warnings.push(format!("CLASSIFY_ENDPOINT is empty, using {}", DEFAULT_ENDPOINT));
                DEFAULT_ENDPOINT.to_string()
            }
            None => DEFAULT_ENDPOINT.to_string(),
        };

        let log_level = match log_level {
            Some(value) => value.trim().parse::<Level>().unwrap_or_else(|_| {
                warnings.push(format!(
                    "Invalid CLASSIFY_LOG_LEVEL {:?}, using {}",
                    value, DEFAULT_LOG_LEVEL
                ));
                DEFAULT_LOG_LEVEL
            }),
            None => DEFAULT_LOG_LEVEL,
        };

        AppConfig { endpoint, log_level, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_values(None, None);
        assert_eq!(config.endpoint, "/classify_endpoint");
        assert_eq!(config.log_level, Level::Info);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_values(Some("https://api.example.test/classify"), Some("DEBUG"));
        assert_eq!(config.endpoint, "https://api.example.test/classify");
        assert_eq!(config.log_level, Level::Debug);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn bad_values_fall_back_with_warnings() {
        let config = AppConfig::from_values(Some("  "), Some("loud"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.warnings.len(), 2);
    }
}
