use std::{collections::HashMap, future::Future, path::PathBuf};

/// Placeholder tokens mapped to their literal replacement values.
///
/// Each entry is a verbatim substitution, not a templating-language
/// expression; keys are assumed not to overlap or nest.
pub type Placeholders = HashMap<String, String>;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Load the template at `location` and substitute the given placeholders.
    ///
    /// An unreadable template is logged and reported as an empty string,
    /// never as an error; dispatch treats an empty rendering as "no content".
    fn render(
        &self,
        location: &str,
        placeholders: &Placeholders,
    ) -> impl Future<Output = String> + Send;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render(
        mut self,
        location: String,
        placeholders: Placeholders,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .withf(move |l, p| l == location && *p == placeholders)
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }
}

/// Where a template identifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLocation {
    /// Scheme-qualified location, loaded as-is.
    Qualified(PathBuf),
    /// Bare name, resolved against the configured template root.
    Relative(String),
}

impl TemplateLocation {
    pub const FILE_SCHEME: &'static str = "file:";

    pub fn parse(location: &str) -> Self {
        match location.strip_prefix(Self::FILE_SCHEME) {
            Some(path) => Self::Qualified(path.into()),
            None => Self::Relative(location.into()),
        }
    }
}
