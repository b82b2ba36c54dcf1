//! config-rs/lib.rs
//! Shared configuration utilities for the ad insights services
//! Provides standardized functions for `.env` loading and port/address management

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

/// Load `.env` from the working directory, if one exists.
///
/// Values from the file override variables already set in the process
/// environment. Returns `true` when a file was found and loaded.
pub fn load_dotenv() -> bool {
    load_dotenv_from(".env")
}

/// Load a dotenv-format file, overriding existing variables
pub fn load_dotenv_from(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match dotenv::from_path_iter(path) {
        Ok(entries) => {
            apply_overrides(entries);
            log::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(err) if err.not_found() => false,
        Err(err) => {
            log::warn!("Failed to read {}: {}", path.display(), err);
            false
        }
    }
}

fn apply_overrides(entries: impl Iterator<Item = dotenv::Result<(String, String)>>) {
    for entry in entries {
        match entry {
            Ok((key, value)) => env::set_var(key, value),
            Err(err) => log::warn!("Skipping malformed .env line: {}", err),
        }
    }
}

/// Get service port from environment variables with proper fallback
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "AD_INSIGHTS")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// The port number to use for the service
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", env_name(service_name));
    match env::var(&var_name) {
        Ok(value) => value.parse::<u16>().unwrap_or_else(|_| {
            log::warn!("Invalid port in {}, using default {}", var_name, default_port);
            default_port
        }),
        Err(_) => default_port,
    }
}

/// Create a SocketAddr for binding a service
///
/// `<SERVICE>_SERVICE_ADDR` may hold a full `host:port` address, optionally
/// prefixed with `http://` or `https://`. Otherwise the service binds every
/// interface on the port from [`get_service_port`].
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", env_name(service_name));

    if let Ok(addr_str) = env::var(&var_name) {
        let trimmed = addr_str
            .strip_prefix("http://")
            .or_else(|| addr_str.strip_prefix("https://"))
            .unwrap_or(&addr_str);

        match trimmed.parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => log::warn!("Invalid address format in {}, using default", var_name),
        }
    }

    let port = get_service_port(service_name, default_port);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Get service name for logging and monitoring
pub fn get_formatted_service_name(service_name: &str) -> String {
    format!("{}-service", service_name.to_lowercase().replace('_', "-"))
}

fn env_name(service_name: &str) -> String {
    service_name.to_uppercase().replace('-', "_")
}
