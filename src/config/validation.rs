//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All errors are collected so a
//! bad file is reported in one go.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.api_prefix '{0}' is not an absolute http(s) URL")]
    ApiPrefix(String),

    #[error("upstream.per_page must be greater than zero")]
    PerPage,

    #[error("session.cookie_name must not be empty")]
    CookieName,

    #[error("session.max_age_secs must be greater than zero")]
    SessionAge,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(prefix) = config.upstream.api_prefix.as_deref().filter(|p| !p.is_empty()) {
        let valid = Url::parse(prefix)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::ApiPrefix(prefix.to_string()));
        }
    }

    if config.upstream.per_page == 0 {
        errors.push(ValidationError::PerPage);
    }
    if config.session.cookie_name.is_empty() {
        errors.push(ValidationError::CookieName);
    }
    if config.session.max_age_secs == 0 {
        errors.push(ValidationError::SessionAge);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
