use std::{collections::HashMap, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
use courier_models::email_address::EmailAddress;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    let config: Config = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")?;
    config.mail.validate()?;
    Ok(config)
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub from: Option<EmailAddress>,
    pub template_root: Option<TemplateRoot>,
    #[serde(default = "default_encoding")]
    pub default_encoding: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl MailConfig {
    /// Startup precondition: the connection settings must be complete.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, value) in [
            ("mail.host", &self.host),
            ("mail.username", &self.username),
            ("mail.password", &self.password),
        ] {
            anyhow::ensure!(
                !value.is_empty(),
                "Incomplete mail configuration: {key} must not be empty"
            );
        }
        Ok(())
    }
}

fn default_encoding() -> String {
    "UTF-8".into()
}

/// Base directory against which bare template names are resolved. At most one
/// trailing path separator is removed on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRoot(String);

impl TemplateRoot {
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        if root.ends_with('/') {
            root.pop();
        }
        Self(root)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl<'de> Deserialize<'de> for TemplateRoot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}
