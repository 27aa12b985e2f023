// Configuration module entry point
// Loads startup configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, FunctionConfig, PerformanceConfig};

/// Environment variable holding the secret echoed by the greeting function
pub const MY_KEY_VAR: &str = "MY_KEY";

impl Config {
    /// Load configuration from the given file path (extension optional)
    ///
    /// A missing file is fine; defaults and environment variables still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with_key(config_path, std::env::var(MY_KEY_VAR).ok())
    }

    /// Load configuration with an explicit `MY_KEY` value instead of reading the environment
    pub fn load_with_key(
        config_path: &str,
        my_key: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 7071)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "hello-function/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("function.path", "/hello")?
            .set_default("function.my_key", "")?
            .set_override_option("function.my_key", my_key)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Serializes tests that change process environment variables
    #[cfg(test)]
    pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
        ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Built-in defaults only, with no file and no `MY_KEY`
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let missing = std::env::temp_dir().join("hello-function-no-such-config");
        Self::load_with_key(&missing.to_string_lossy(), None).expect("default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn missing_path() -> String {
        std::env::temp_dir()
            .join("hello-function-no-such-config")
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::for_tests();
        assert_eq!(cfg.server.port, 7071);
        assert_eq!(cfg.function.path, "/hello");
        assert_eq!(cfg.function.my_key, "");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
    }

    #[test]
    fn test_my_key_is_injected() {
        let cfg = Config::load_with_key(&missing_path(), Some("s3cret".to_string())).unwrap();
        assert_eq!(cfg.function.my_key, "s3cret");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "hello-function-test-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[function]\npath = \"/api/hello\"\nmy_key = \"from-file\""
        )
        .unwrap();

        let cfg = Config::load_with_key(path.to_str().unwrap(), None).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.function.path, "/api/hello");
        assert_eq!(cfg.function.my_key, "from-file");

        // The environment value wins over the file
        let cfg = Config::load_with_key(path.to_str().unwrap(), Some("env".to_string())).unwrap();
        assert_eq!(cfg.function.my_key, "env");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_from_reads_environment() {
        let _guard = Config::env_lock();
        std::env::set_var(MY_KEY_VAR, "from-env");
        std::env::set_var("SERVER_PERFORMANCE__MAX_CONNECTIONS", "64");

        let cfg = Config::load_from(&missing_path()).unwrap();
        assert_eq!(cfg.function.my_key, "from-env");
        assert_eq!(cfg.performance.max_connections, Some(64));

        std::env::remove_var(MY_KEY_VAR);
        std::env::remove_var("SERVER_PERFORMANCE__MAX_CONNECTIONS");

        let cfg = Config::load_from(&missing_path()).unwrap();
        assert_eq!(cfg.function.my_key, "");
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::for_tests();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:7071".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
