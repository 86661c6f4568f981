use rowgate_api::PluginError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("config ({resource}): {detail}")]
    Config { resource: &'static str, detail: String },

    #[error("{0}")]
    Plugin(#[from] PluginError),
}

impl PipelineError {
    /// Convert to PluginError preserving ErrorKind.
    ///
    /// `Config` → Config kind.
    /// `Plugin(PluginError)` → inner PluginError as-is (kind preserved).
    pub fn into_plugin_error(self) -> PluginError {
        match self {
            PipelineError::Config { resource, detail } => {
                PluginError::config(format!("{resource}: {detail}"))
            }
            PipelineError::Plugin(e) => e,
        }
    }
}
