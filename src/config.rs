use std::{
    env,
    fmt::{self, Display},
    error::Error,
    str::FromStr,
};

pub const DB_URL_KEY: &str = "POLLS_DB_URL";
pub const HOST_KEY: &str = "POLLS_HOST";
pub const PORT_KEY: &str = "POLLS_PORT";

const DEFAULT_DB_URL: &str = "sqlite://polls.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } =>
                write!(f, "Invalid value [{}] for {}: {}", value, key, reason),
        }
    }
}

impl Error for ConfigError {}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        Ok(Config {
            db_url: try_load(&lookup, DB_URL_KEY, DEFAULT_DB_URL)?,
            host: try_load(&lookup, HOST_KEY, DEFAULT_HOST)?,
            port: try_load(&lookup, PORT_KEY, DEFAULT_PORT)?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {} value: {}", key, e);
        ConfigError::Invalid { key, reason: e.to_string(), value }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(Config {
            db_url: DEFAULT_DB_URL.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            port: 8080,
        }, config);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (DB_URL_KEY, "sqlite::memory:"),
            (HOST_KEY, "0.0.0.0"),
            (PORT_KEY, "3030"),
        ])).unwrap();
        assert_eq!("sqlite::memory:", config.db_url);
        assert_eq!("0.0.0.0", config.host);
        assert_eq!(3030, config.port);
    }

    #[test]
    fn bad_port() {
        let error = Config::from_lookup(lookup_from(&[(PORT_KEY, "eighty")]))
            .expect_err("Should reject a non-numeric port");
        match error {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(PORT_KEY, key);
                assert_eq!("eighty", value);
            }
        }
    }
}
