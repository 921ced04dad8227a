use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let jwt = JwtConfig {
            access_secret: std::env::var("JWT_ACCESS_SECRET")?,
            refresh_secret: std::env::var("JWT_REFRESH_SECRET")?,
            access_ttl_minutes: std::env::var("JWT_ACCESS_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(120),
        };
        let provider = ProviderConfig {
            api_key: std::env::var("POLYGON_API_KEY")?,
            base_url: std::env::var("POLYGON_BASE_URL")
                .unwrap_or_else(|_| "https://api.polygon.io".into()),
        };
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults_host_and_port() {
        std::env::set_var("DATABASE_URL", "postgres://postgres@localhost/test");
        std::env::set_var("JWT_ACCESS_SECRET", "a");
        std::env::set_var("JWT_REFRESH_SECRET", "r");
        std::env::set_var("POLYGON_API_KEY", "k");
        std::env::remove_var("APP_HOST");
        std::env::remove_var("APP_PORT");

        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt.access_ttl_minutes, 15);
        assert_eq!(config.jwt.refresh_ttl_minutes, 120);
    }
}
