// Configuration module entry point
// Loads layered configuration and derives the handler options

mod state;
mod types;

use crate::handler::ServeOptions;
use crate::http::cache::DEFAULT_CACHE_CONTROL;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig};

/// Config file used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `STATIC_SERVER__PORT=9000`
const ENV_PREFIX: &str = "STATIC";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest precedence first: defaults, the file (if present),
    /// `STATIC_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("static_files.cache_control", DEFAULT_CACHE_CONTROL)?
            .set_default("static_files.compress", false)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Build handler options, resolving the root directory once
    ///
    /// A relative or missing `root_dir` is taken relative to `cwd`. The
    /// directory must exist.
    pub fn serve_options(&self, cwd: &Path) -> io::Result<ServeOptions> {
        let root = self
            .static_files
            .root_dir
            .as_deref()
            .map_or_else(|| cwd.to_path_buf(), |dir| cwd.join(dir));
        let root: PathBuf = root.canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Invalid root directory '{}': {e}", root.display()),
            )
        })?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Root '{}' is not a directory", root.display()),
            ));
        }

        Ok(ServeOptions::new(root)
            .with_cache_control(self.static_files.cache_control.clone())
            .with_compress(self.static_files.compress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.access_log_format, "combined");
        assert!(config.performance.keep_alive);
        assert_eq!(config.performance.max_connections, None);
        assert_eq!(config.static_files.root_dir, None);
        assert_eq!(config.static_files.cache_control, "public, max-age=86400");
        assert!(!config.static_files.compress);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(
            &path,
            r#"
[server]
port = 9090
workers = 2

[performance]
max_connections = 64

[static_files]
root_dir = "public"
cache_control = "private, max-age=600"
compress = true
"#,
        )
        .unwrap();

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.workers, Some(2));
        assert_eq!(config.performance.max_connections, Some(64));
        assert_eq!(config.performance.read_timeout, 30);
        assert_eq!(config.static_files.root_dir.as_deref(), Some("public"));
        assert_eq!(config.static_files.cache_control, "private, max-age=600");
        assert!(config.static_files.compress);
    }

    #[test]
    fn test_socket_addr() {
        let mut config = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(
            config.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
        config.server.host = "not a host".to_string();
        assert!(config.get_socket_addr().is_err());
    }

    #[test]
    fn test_serve_options_resolves_root() {
        let cwd = tempfile::tempdir().unwrap();
        fs::create_dir(cwd.path().join("public")).unwrap();

        let mut config = Config::load_from("no-such-config-file").unwrap();
        let options = config.serve_options(cwd.path()).unwrap();
        assert_eq!(options.root_dir, cwd.path().canonicalize().unwrap());
        assert_eq!(options.cache_control, "public, max-age=86400");

        config.static_files.root_dir = Some("public".to_string());
        config.static_files.compress = true;
        let options = config.serve_options(cwd.path()).unwrap();
        assert_eq!(
            options.root_dir,
            cwd.path().join("public").canonicalize().unwrap()
        );
        assert!(options.compress);
    }

    #[test]
    fn test_serve_options_rejects_bad_root() {
        let cwd = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join("file.txt"), "x").unwrap();
        let mut config = Config::load_from("no-such-config-file").unwrap();

        config.static_files.root_dir = Some("missing".to_string());
        assert!(config.serve_options(cwd.path()).is_err());

        config.static_files.root_dir = Some("file.txt".to_string());
        assert!(config.serve_options(cwd.path()).is_err());
    }
}
