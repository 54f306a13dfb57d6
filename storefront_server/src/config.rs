use std::{env, str::FromStr, time::Duration};

use chrono::Duration as ChronoDuration;
use log::*;
use storefront_common::helpers::{parse_boolean_flag, parse_value};
use storefront_engine::{
    db_types::Cents,
    order_objects::{CheckoutRules, DEFAULT_IDEMPOTENCY_WINDOW_HOURS, DEFAULT_MAX_LINE_QUANTITY},
    DbSettings,
    TransitionPolicy,
};

const DEFAULT_SF_HOST: &str = "127.0.0.1";
const DEFAULT_SF_PORT: u16 = 8470;
const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_settings: DbSettings,
    /// If true, 5xx error responses include the underlying error. Never enable this in production.
    pub dev_mode: bool,
    pub transition_policy: TransitionPolicy,
    pub checkout_rules: CheckoutRules,
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SF_HOST.to_string(),
            port: DEFAULT_SF_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_settings: DbSettings {
                max_connections: DEFAULT_DB_MAX_CONNECTIONS,
                timeout: Duration::from_secs(DEFAULT_DB_TIMEOUT_SECS),
            },
            dev_mode: false,
            transition_policy: TransitionPolicy::default(),
            checkout_rules: CheckoutRules::default(),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from a key lookup. Missing values take their defaults; invalid ones are logged and
    /// also take their defaults.
    pub fn from_source<F>(var: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let defaults = Self::default();
        let host = var("SF_HOST").unwrap_or(defaults.host);
        let port = value_or_default(&var, "SF_PORT", defaults.port);
        let database_url = var("SF_DATABASE_URL").unwrap_or_else(|| {
            warn!("🪛️ SF_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            defaults.database_url
        });
        let max_connections = value_or_default(&var, "SF_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
        let timeout = Duration::from_secs(value_or_default(&var, "SF_DB_TIMEOUT", DEFAULT_DB_TIMEOUT_SECS));
        let db_settings = DbSettings { max_connections, timeout };
        let dev_mode = parse_boolean_flag(var("SF_DEV_MODE"), false);
        if dev_mode {
            warn!("🚨️ Dev mode is on. Error responses will include internal error details.");
        }
        let strict = parse_boolean_flag(var("SF_STRICT_TRANSITIONS"), false);
        let transition_policy = TransitionPolicy::from_strict_flag(strict);
        let checkout_rules = configure_checkout_rules(&var);
        let run_migrations = parse_boolean_flag(var("SF_RUN_MIGRATIONS"), true);
        Self { host, port, database_url, db_settings, dev_mode, transition_policy, checkout_rules, run_migrations }
    }
}

fn value_or_default<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match parse_value::<T>(var(key)) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            error!("🪛️ {key}: {e} Using the default, {default}, instead.");
            default
        },
        None => default,
    }
}

fn configure_checkout_rules<F>(var: &F) -> CheckoutRules
where F: Fn(&str) -> Option<String> {
    let defaults = CheckoutRules::default();
    let max_unit_price = value_or_default::<_, Cents>(var, "SF_MAX_UNIT_PRICE", defaults.max_unit_price);
    let max_line_quantity = match value_or_default(var, "SF_MAX_LINE_QUANTITY", DEFAULT_MAX_LINE_QUANTITY) {
        q if q < 1 => {
            error!("🪛️ SF_MAX_LINE_QUANTITY must be at least 1. Using the default, {DEFAULT_MAX_LINE_QUANTITY}.");
            DEFAULT_MAX_LINE_QUANTITY
        },
        q => q,
    };
    let hours = match value_or_default(var, "SF_IDEMPOTENCY_WINDOW", DEFAULT_IDEMPOTENCY_WINDOW_HOURS) {
        h if h < 0 => {
            error!("🪛️ SF_IDEMPOTENCY_WINDOW cannot be negative. Using the default, {DEFAULT_IDEMPOTENCY_WINDOW_HOURS}.");
            DEFAULT_IDEMPOTENCY_WINDOW_HOURS
        },
        h => h,
    };
    let rules = CheckoutRules { max_unit_price, max_line_quantity, idempotency_window: ChronoDuration::hours(hours) };
    info!("🪛️ Checkout rules: {rules:?}");
    rules
}
