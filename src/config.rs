use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PRODUCT_API_CONFIG";

/// 服务配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub products: ProductsConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 绑定地址
    pub bind_address: String,
    pub port: u16,
    /// 请求超时时间（秒）
    pub request_timeout_seconds: u64,
}

/// 数据库配置，`url` 为空时使用内存存储
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// 启动时建表
    pub run_migrations: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
}

/// 产品接口行为开关
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductsConfig {
    /// GET /products 返回分页对象而不是数组
    pub pagination: bool,
    pub expose_updated_at: bool,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_seconds: 8,
            run_migrations: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            pagination: false,
            expose_updated_at: true,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 环境变量覆盖
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = Some(url);
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be greater than 0".to_string()));
        }
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(
                "database.min_connections exceeds database.max_connections".to_string(),
            ));
        }
        if self.database.acquire_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "database.acquire_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid log level: {}, expected one of {:?}",
                self.logging.level, valid_levels
            )));
        }

        if self.products.default_page_size == 0 || self.products.max_page_size == 0 {
            return Err(ConfigError::Validation("page sizes must be greater than 0".to_string()));
        }
        if self.products.default_page_size > self.products.max_page_size {
            return Err(ConfigError::Validation(
                "products.default_page_size exceeds products.max_page_size".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// 从文件或默认值加载配置，并应用环境变量、完成校验
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            info!("Loading config from {}", path);
            Config::load_from_file(&path)?
        }
        Err(_) => load_from_default_paths()?,
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn load_from_default_paths() -> Result<Config, ConfigError> {
    let config_paths = ["config.toml", "./config/config.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            info!("Loading config from {}", path);
            return Config::load_from_file(path);
        }
    }

    info!("No config file found, using defaults");
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, None);
        assert_eq!(config.logging.level, "info");
        assert!(!config.products.pagination);
        assert!(config.products.expose_updated_at);
        assert_eq!(config.products.default_page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.products.default_page_size = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.min_connections = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[products]
pagination = true
"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert!(config.products.pagination);
        assert_eq!(config.products.max_page_size, 100);
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn test_unparsable_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::load_from_file("/nonexistent/config.toml"),
            Err(ConfigError::FileRead(_))
        ));
    }
}
