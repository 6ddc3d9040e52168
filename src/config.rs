use std::env;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Optional cap applied to list queries (`LIMIT`). Unset = unbounded.
    pub max_list_rows: Option<i64>,
    pub logo_url: String,
    pub logo_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let host = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8094".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid u16".to_string())?;

        let max_list_rows = match env::var("MAX_LIST_ROWS") {
            Ok(v) => Some(
                v.parse::<i64>()
                    .map_err(|_| "MAX_LIST_ROWS must be a valid integer".to_string())?,
            ),
            Err(_) => None,
        };

        let logo_url = env::var("LOGO_URL")
            .unwrap_or_else(|_| "https://tesoreria.gob.mx/static/img/escudo_institucional.png".to_string());

        let logo_timeout_secs: u64 = env::var("LOGO_TIMEOUT_SECS")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|_| "LOGO_TIMEOUT_SECS must be a valid u64".to_string())?;

        Ok(Config {
            database_url,
            host,
            port,
            max_list_rows,
            logo_url,
            logo_timeout_secs,
        })
    }
}
