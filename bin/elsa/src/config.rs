use std::net::SocketAddr;
use std::time::Duration;

use crate::{Error, Result, UserId, DEFAULT_ACK_TIMEOUT, DEFAULT_KEEPALIVE};

const DEFAULT_WS_ADDRESS: &str = "0.0.0.0:443";
const DEFAULT_POLL_TIMEOUT: u64 = 10;

#[derive(Debug, PartialEq)]
pub struct Config {
    pub bot_token: String,
    pub admin: UserId,
    pub allowed_users: Vec<UserId>,
    pub ws_address: SocketAddr,
    pub ack_timeout: Duration,
    pub poll_timeout: u64,
    pub keepalive: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN").ok_or_else(|| missing("BOT_TOKEN"))?;

        let admin = lookup("ADMIN_USER_ID").ok_or_else(|| missing("ADMIN_USER_ID"))?;
        let admin = parse("ADMIN_USER_ID", &admin)?;

        let allowed_users: Vec<UserId> = match lookup("ALLOWED_USERS") {
            Some(users) => serde_json::from_str(&users).map_err(|err| Error::Config {
                variable: "ALLOWED_USERS",
                reason: err.to_string(),
            })?,
            None => vec![],
        };

        let ws_address = lookup("WS_ADDRESS").unwrap_or_else(|| DEFAULT_WS_ADDRESS.to_string());
        let ws_address = parse("WS_ADDRESS", &ws_address)?;

        let ack_timeout = match lookup("ACK_TIMEOUT_MS") {
            Some(millis) => Duration::from_millis(parse("ACK_TIMEOUT_MS", &millis)?),
            None => DEFAULT_ACK_TIMEOUT,
        };

        let poll_timeout = match lookup("POLL_TIMEOUT_SECS") {
            Some(secs) => parse("POLL_TIMEOUT_SECS", &secs)?,
            None => DEFAULT_POLL_TIMEOUT,
        };

        let keepalive = match lookup("KEEPALIVE_SECS") {
            Some(secs) => Duration::from_secs(parse("KEEPALIVE_SECS", &secs)?),
            None => DEFAULT_KEEPALIVE,
        };

        if keepalive.is_zero() {
            return Err(Error::Config {
                variable: "KEEPALIVE_SECS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Config {
            bot_token,
            admin,
            allowed_users,
            ws_address,
            ack_timeout,
            poll_timeout,
            keepalive,
        })
    }
}

fn missing(variable: &'static str) -> Error {
    Error::Config {
        variable,
        reason: "not set".to_string(),
    }
}

fn parse<T>(variable: &'static str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| Error::Config {
        variable,
        reason: format!("{value:?}: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("BOT_TOKEN", "123:abc"), ("ADMIN_USER_ID", "42")]).unwrap();

        assert_eq!(
            config,
            Config {
                bot_token: "123:abc".to_string(),
                admin: 42,
                allowed_users: vec![],
                ws_address: "0.0.0.0:443".parse().unwrap(),
                ack_timeout: Duration::from_secs(4),
                poll_timeout: 10,
                keepalive: Duration::from_secs(20),
            }
        );
    }

    #[test]
    fn test_all_variables() {
        let config = config(&[
            ("BOT_TOKEN", "123:abc"),
            ("ADMIN_USER_ID", "42"),
            ("ALLOWED_USERS", "[7, 8]"),
            ("WS_ADDRESS", "127.0.0.1:8443"),
            ("ACK_TIMEOUT_MS", "1500"),
            ("POLL_TIMEOUT_SECS", "30"),
            ("KEEPALIVE_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.allowed_users, vec![7, 8]);
        assert_eq!(config.ws_address, "127.0.0.1:8443".parse().unwrap());
        assert_eq!(config.ack_timeout, Duration::from_millis(1500));
        assert_eq!(config.poll_timeout, 30);
        assert_eq!(config.keepalive, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_token() {
        let result = config(&[("ADMIN_USER_ID", "42")]);

        assert!(matches!(
            result,
            Err(Error::Config {
                variable: "BOT_TOKEN",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_values() {
        let result = config(&[("BOT_TOKEN", "123:abc"), ("ADMIN_USER_ID", "admin")]);
        assert!(matches!(
            result,
            Err(Error::Config {
                variable: "ADMIN_USER_ID",
                ..
            })
        ));

        let result = config(&[
            ("BOT_TOKEN", "123:abc"),
            ("ADMIN_USER_ID", "42"),
            ("ALLOWED_USERS", "7,8"),
        ]);
        assert!(matches!(
            result,
            Err(Error::Config {
                variable: "ALLOWED_USERS",
                ..
            })
        ));

        let result = config(&[
            ("BOT_TOKEN", "123:abc"),
            ("ADMIN_USER_ID", "42"),
            ("KEEPALIVE_SECS", "0"),
        ]);
        assert!(matches!(
            result,
            Err(Error::Config {
                variable: "KEEPALIVE_SECS",
                ..
            })
        ));
    }
}
