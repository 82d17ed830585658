use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "WEBROOT_CONFIG";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WEB_ROOT: &str = "./www";

/// Server configuration: the port to listen on and the directory to serve.
///
/// Immutable once loaded; the server shares it read-only between tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_web_root() -> PathBuf {
    PathBuf::from(DEFAULT_WEB_ROOT)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            web_root: default_web_root(),
        }
    }
}

impl Config {
    pub fn new(port: u16, web_root: impl Into<PathBuf>) -> Self {
        Self {
            port,
            web_root: web_root.into(),
        }
    }

    /// Loads the process configuration.
    ///
    /// Starts from the defaults, layers the YAML file named by
    /// `WEBROOT_CONFIG` if set, then the positional `[port] [web_root]`
    /// command-line arguments.
    pub fn load() -> anyhow::Result<Self> {
        let base = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };

        base.with_args(std::env::args().skip(1))
    }

    /// Parses a YAML document with optional `port` and `web_root` keys.
    pub fn from_yaml(source: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(source).context("invalid configuration")
    }

    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&source)
    }

    /// Overrides port and web root from positional arguments (program name excluded).
    pub fn with_args<I>(mut self, args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);

        if let Some(port) = args.next() {
            self.port = port
                .parse()
                .with_context(|| format!("invalid port: {port:?}"))?;
        }

        if let Some(web_root) = args.next() {
            self.web_root = PathBuf::from(web_root);
        }

        Ok(self)
    }

    /// Address the listening socket binds to (all IPv4 interfaces).
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
