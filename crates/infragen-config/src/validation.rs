// Configuration validation
//
// Validates that values are usable and warns about suspicious ones

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_server_config(&config.server)?;
    validate_request_config(&config.request)?;
    validate_generator_config(&config.generator)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.listen_addr.is_empty() {
        bail!("server.listen_addr must not be empty");
    }

    let Some((_, port)) = config.listen_addr.rsplit_once(':') else {
        bail!("server.listen_addr must be in format 'host:port'");
    };
    if port.parse::<u16>().is_err() {
        bail!("server.listen_addr has an invalid port: {}", port);
    }

    if config.log_level.trim().is_empty() {
        bail!("server.log_level must not be empty");
    }

    Ok(())
}

fn validate_request_config(config: &RequestConfig) -> Result<()> {
    if config.max_payload_bytes == 0 {
        bail!("request.max_payload_bytes must be greater than 0");
    }

    // Configurations are a handful of scalar fields
    if config.max_payload_bytes > 16 * 1024 * 1024 {
        warn!(
            max_payload_bytes = config.max_payload_bytes,
            "request.max_payload_bytes is very large for configuration payloads"
        );
    }

    Ok(())
}

fn validate_generator_config(config: &GeneratorConfig) -> Result<()> {
    if config.enabled_services.is_empty() {
        warn!("generator.enabled_services is empty; every generate request will be rejected");
    }

    for (region, image) in &config.images {
        if region.trim().is_empty() {
            bail!("generator.images contains an empty region name");
        }
        if !image.starts_with("ami-") {
            bail!(
                "generator.images.{} must be an AMI id (ami-...), got '{}'",
                region,
                image
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_server_config() {
        assert!(validate_server_config(&ServerConfig::default()).is_ok());

        let hostname = ServerConfig {
            listen_addr: "localhost:3001".to_string(),
            ..Default::default()
        };
        assert!(validate_server_config(&hostname).is_ok());

        for addr in ["", "3001", "0.0.0.0:http", "0.0.0.0:70000"] {
            let invalid = ServerConfig {
                listen_addr: addr.to_string(),
                ..Default::default()
            };
            assert!(validate_server_config(&invalid).is_err(), "{:?}", addr);
        }
    }

    #[test]
    fn test_validate_request_config() {
        assert!(validate_request_config(&RequestConfig::default()).is_ok());
        assert!(validate_request_config(&RequestConfig {
            max_payload_bytes: 0
        })
        .is_err());
    }

    #[test]
    fn test_validate_generator_config() {
        let empty = GeneratorConfig {
            enabled_services: vec![],
            ..Default::default()
        };
        // Allowed, only warned about
        assert!(validate_generator_config(&empty).is_ok());

        let mut bad_image = GeneratorConfig::default();
        bad_image
            .images
            .insert("us-west-2".to_string(), "img-123".to_string());
        assert!(validate_generator_config(&bad_image).is_err());
    }
}
