//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use std::net::SocketAddr;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(config)?;
    Ok(())
}

/// Validate server settings.
fn validate_server(config: &Config) -> Result<()> {
    parse_bind_addr(&config.server.bind)?;

    if config.server.max_upload_bytes == 0 {
        return Err(Error::ConfigValidation {
            message: "server.max_upload_bytes must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Parse a bind address from configuration or CLI.
pub fn parse_bind_addr(bind: &str) -> Result<SocketAddr> {
    bind.parse().map_err(|_| Error::ConfigValidation {
        message: format!("server.bind must be a socket address like 127.0.0.1:8501, got '{bind}'"),
    })
}
