//! Runtime application configuration from environment variables.

/// Runtime configuration populated from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub rewrite_model: String,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            rewrite_model: rewrite_client::DEFAULT_MODEL.into(),
            server_port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `API_KEY` is the credential name deployments supply; `GEMINI_API_KEY`
    /// is accepted as an alias.
    pub fn load() -> Self {
        let api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .unwrap_or_default();

        let rewrite_model = match std::env::var("REWRITE_MODEL") {
            Ok(model) if !model.is_empty() => model,
            _ => rewrite_client::DEFAULT_MODEL.into(),
        };

        let server_port = std::env::var("SERVER_PORT")
            .map(|v| parse_u16(&v, 8080))
            .unwrap_or(8080);

        Self {
            api_key,
            rewrite_model,
            server_port,
        }
    }
}

fn parse_u16(s: &str, default: u16) -> u16 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_u16_falls_back_on_garbage() {
        assert_eq!(parse_u16("", 8080), 8080);
        assert_eq!(parse_u16("not-a-port", 8080), 8080);
        assert_eq!(parse_u16("3000", 8080), 3000);
    }

    #[test]
    fn default_config_has_no_credential() {
        let config = AppConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.rewrite_model, rewrite_client::DEFAULT_MODEL);
    }
}
