//! 日志初始化

use crate::config::{LogFormat, LoggingConfig};
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// 构建过滤器：设置了 `RUST_LOG` 时以其为准，否则使用配置中的级别
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e)),
    }
}

/// 安装全局 tracing 订阅器，进程内只能调用一次
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let format = config
        .log_format()
        .ok_or_else(|| anyhow!("Unknown log format: {}", config.format))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("Logging initialized (level={}, format={})", config.level, config.format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "rso=loud".to_string(),
            format: "compact".to_string(),
        };
        assert!(build_filter(&config).is_err());
    }

    #[test]
    fn test_directive_level_accepted() {
        let config = LoggingConfig {
            level: "info,rso_web=debug".to_string(),
            format: "json".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
        };
        assert!(init_logging(&config).is_err());
    }
}
