pub mod config;
pub mod error;
pub mod framing;
pub mod statement;
mod encoding;
mod gate;
mod projection;
mod resource;
mod sink;
mod stream;

pub use error::PipelineError;
pub use encoding::{DEFAULT_ENCODING, decoder_for};
pub use gate::DedupGate;
pub use projection::project;
pub use resource::{MEMORY_CONNECTION, open_filter, open_store, open_table_sink};
pub use sink::{DrainOutcome, IngestionSink, spawn_sink_task};
pub use stream::{ChannelStream, record_channel};
