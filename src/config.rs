use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// User configuration, deserialized from an optional TOML file.
///
/// Every field is a default: command-line flags always win. Top-level
/// fields apply to all servers; a `[servers."imap.example.com"]` table
/// overrides them for that server only.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub defaults: ServerDefaults,
    #[serde(default)]
    pub servers: HashMap<String, ServerDefaults>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ServerDefaults {
    pub user: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<bool>,
    pub password_env: Option<String>,
    pub password_file: Option<PathBuf>,
    pub password_cmd: Option<String>,
}

impl Config {
    /// Reads the configuration from the given path, or from the default
    /// location.
    ///
    /// A missing file at the default location is not an error, it just
    /// means an empty configuration. An explicitly given path must exist.
    pub fn from_opt_path(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(eyre!("config file {} not found", path.display()));
                }
                path.to_owned()
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!(path = %path.display(), "reading config file");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("cannot parse config file {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("imapdu").join("config.toml"))
    }

    /// Merged defaults for one server: its `[servers]` entry, falling
    /// back to the top-level fields.
    pub fn for_server(&self, host: &str) -> ServerDefaults {
        let specific = self.servers.get(host).cloned().unwrap_or_default();
        ServerDefaults {
            user: specific.user.or_else(|| self.defaults.user.clone()),
            port: specific.port.or(self.defaults.port),
            tls: specific.tls.or(self.defaults.tls),
            password_env: specific
                .password_env
                .or_else(|| self.defaults.password_env.clone()),
            password_file: specific
                .password_file
                .or_else(|| self.defaults.password_file.clone()),
            password_cmd: specific
                .password_cmd
                .or_else(|| self.defaults.password_cmd.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;

    use super::*;

    fn make_config(config: &str) -> Result<Config> {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", config).unwrap();
        Config::from_opt_path(Some(file.path()))
    }

    #[test]
    fn empty_config() {
        let config = make_config("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_explicit_config_fails() {
        let config = Config::from_opt_path(Some(Path::new("/does/not/exist.toml")));
        assert!(config
            .unwrap_err()
            .to_string()
            .contains("/does/not/exist.toml not found"));
    }

    #[test]
    fn invalid_config_fails() {
        let config = make_config("tls = \"maybe\"");
        assert!(config.is_err());
    }

    #[test]
    fn top_level_defaults() {
        let config = make_config(
            "user = \"chris\"
            tls = true
            password-cmd = \"pass show imap\"",
        )
        .unwrap();

        let defaults = config.for_server("imap.example.com");
        assert_eq!(defaults.user.as_deref(), Some("chris"));
        assert_eq!(defaults.tls, Some(true));
        assert_eq!(defaults.password_cmd.as_deref(), Some("pass show imap"));
        assert_eq!(defaults.port, None);
    }

    #[test]
    fn server_section_overrides_top_level() {
        let config = make_config(
            "user = \"chris\"
            tls = true

            [servers.\"imap.example.com\"]
            user = \"cpackham\"
            port = 1143",
        )
        .unwrap();

        let defaults = config.for_server("imap.example.com");
        assert_eq!(defaults.user.as_deref(), Some("cpackham"));
        assert_eq!(defaults.port, Some(1143));
        assert_eq!(defaults.tls, Some(true));

        let defaults = config.for_server("other.example.com");
        assert_eq!(defaults.user.as_deref(), Some("chris"));
        assert_eq!(defaults.port, None);
    }
}
