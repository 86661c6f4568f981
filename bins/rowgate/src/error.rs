use rowgate_api::PluginError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("{0}")]
    Pipeline(#[from] rowgate_pipeline::PipelineError),

    #[error("{}: {}", .0.kind(), .0)]
    Plugin(#[from] PluginError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("task: {0}")]
    Task(#[from] tokio::task::JoinError),
}
