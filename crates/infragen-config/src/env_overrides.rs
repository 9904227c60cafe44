use crate::{LogFormat, RuntimeConfig};
use anyhow::{anyhow, Context, Result};
use infragen_core::{OutputFormat, ServiceType};

pub const ENV_PREFIX: &str = "INFRAGEN_";

/// Abstraction over environment-variable lookups so tests and embedders can
/// supply their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the INFRAGEN_ prefix
    /// Used for conventional variables such as PORT
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Server configuration (listen addr, log level/format, CORS)
    if let Some(addr) = get_env_string(env, "LISTEN_ADDR") {
        config.server.listen_addr = addr;
    } else if let Some(port) = get_raw_env_u16(env, "PORT")? {
        // Bare PORT keeps the configured host
        let host = config
            .server
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        config.server.listen_addr = format!("{}:{}", host, port);
    }
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.server.log_level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.server.log_format = format
            .parse::<LogFormat>()
            .context("Invalid INFRAGEN_LOG_FORMAT value")?;
    }
    if let Some(val) = get_env_bool(env, "CORS_ENABLED")? {
        config.server.cors_enabled = val;
    }

    // Request configuration
    if let Some(val) = get_env_usize(env, "MAX_PAYLOAD_BYTES")? {
        config.request.max_payload_bytes = val;
    }

    // Generator configuration
    if let Some(list) = get_env_string(env, "ENABLED_SERVICES") {
        config.generator.enabled_services = parse_service_list(&list)?;
    }
    if let Some(format) = get_env_string(env, "OUTPUT_FORMAT") {
        config.generator.output_format = format
            .parse::<OutputFormat>()
            .context("Invalid INFRAGEN_OUTPUT_FORMAT value")?;
    }

    Ok(())
}

/// Comma-separated service ids or aliases; blanks are skipped
fn parse_service_list(list: &str) -> Result<Vec<ServiceType>> {
    let mut services = Vec::new();
    for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        let service = id
            .parse::<ServiceType>()
            .map_err(|_| anyhow!("Invalid {}ENABLED_SERVICES entry: {}", ENV_PREFIX, id))?;
        if !services.contains(&service) {
            services.push(service);
        }
    }
    Ok(services)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
}

fn get_raw_env_u16<E: EnvSource>(env: &E, key: &str) -> Result<Option<u16>> {
    match env.get_raw(key) {
        Some(val) => {
            let parsed = val
                .parse::<u16>()
                .map_err(|e| anyhow!("Failed to parse {}: {}", key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val.parse::<bool>().map_err(|e| {
                anyhow!(
                    "Failed to parse {}{} (expected bool): {}",
                    ENV_PREFIX,
                    key,
                    e
                )
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
