use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use courier_templates_contracts::{Placeholders, TemplateLocation, TemplateService};
use tracing::error;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    config: TemplateServiceConfig,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateServiceConfig {
    pub root: Option<Arc<Path>>,
}

impl TemplateServiceImpl {
    pub fn new(config: TemplateServiceConfig) -> Self {
        Self { config }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match TemplateLocation::parse(location) {
            TemplateLocation::Qualified(path) => path,
            TemplateLocation::Relative(name) => match &self.config.root {
                Some(root) => root.join(name),
                None => name.into(),
            },
        }
    }
}

impl TemplateService for TemplateServiceImpl {
    async fn render(&self, location: &str, placeholders: &Placeholders) -> String {
        let path = self.resolve(location);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) => {
                error!("Failed to read template at {}: {err}", path.display());
                return String::new();
            }
        };
        substitute(&raw, placeholders)
    }
}

/// Replace every occurrence of each placeholder key in a single left-to-right
/// scan-and-copy pass. Scanning resumes after an inserted value, so
/// replacement values are never substituted into again.
fn substitute(text: &str, placeholders: &Placeholders) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        // earliest occurrence wins; ties go to the longer key
        let next = placeholders
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .filter_map(|(key, value)| rest.find(key.as_str()).map(|at| (at, key, value)))
            .min_by_key(|&(at, key, _)| (at, std::cmp::Reverse(key.len())));
        let Some((at, key, value)) = next else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + key.len()..];
    }
    out
}
