//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `FOODCART_HOST` - Bind address (default: 127.0.0.1)
//! - `FOODCART_PORT` - Listen port (default: 8080)
//! - `FOODCART_DEFAULT_DELIVERY_FEE` - Delivery fee when a restaurant sets none (default: 10.00)
//! - `FOODCART_DEFAULT_SERVICE_FEE` - Service fee when a restaurant sets none (default: 5.00)
//! - `FOODCART_ACTOR_BUFFER` - Order actor request queue capacity (default: 32)
//! - `FOODCART_PAGE_SIZE` - Orders per page when the caller gives none (default: 15)
//!
//! A `.env` file in the working directory is read first if present.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

use crate::backend::DEFAULT_PAGE_SIZE;
use crate::pricing::{FeeSchedule, PricingError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    pub default_fees: FeeSchedule,
    pub actor_buffer: usize,
    pub page_size: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            default_fees: FeeSchedule::standard(),
            actor_buffer: 32,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse
    /// or falls outside its range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or("FOODCART_HOST", &lookup, defaults.host)?;
        let port = parse_or("FOODCART_PORT", &lookup, defaults.port)?;
        let delivery_fee = parse_or(
            "FOODCART_DEFAULT_DELIVERY_FEE",
            &lookup,
            defaults.default_fees.delivery_fee(),
        )?;
        let service_fee = parse_or(
            "FOODCART_DEFAULT_SERVICE_FEE",
            &lookup,
            defaults.default_fees.service_fee(),
        )?;
        let actor_buffer = positive(
            "FOODCART_ACTOR_BUFFER",
            parse_or("FOODCART_ACTOR_BUFFER", &lookup, defaults.actor_buffer)?,
        )?;
        let page_size = positive(
            "FOODCART_PAGE_SIZE",
            parse_or("FOODCART_PAGE_SIZE", &lookup, defaults.page_size)?,
        )?;

        let default_fees = FeeSchedule::new(delivery_fee, service_fee).map_err(|e| {
            let (key, value) = match &e {
                PricingError::NegativeFee {
                    fee: "delivery",
                    amount,
                } => ("FOODCART_DEFAULT_DELIVERY_FEE", *amount),
                _ => ("FOODCART_DEFAULT_SERVICE_FEE", service_fee),
            };
            ConfigError::InvalidValue {
                key,
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            host,
            port,
            default_fees,
            actor_buffer,
            page_size,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn positive<T: PartialOrd + Default + std::fmt::Display>(
    key: &'static str,
    value: T,
) -> Result<T, ConfigError> {
    if value <= T::default() {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}
