use std::sync::Arc;

use rowgate_api::{PluginError, RowStore};
use storage_memory::MemoryStore;
use storage_mysql::MySqlGateway;

use crate::PipelineError;
use crate::config::{ResourceConfig, ResourceKind};
use crate::encoding::decoder_for;
use crate::gate::DedupGate;
use crate::sink::IngestionSink;

/// Connection string, выбирающий in-memory store вместо MySQL.
pub const MEMORY_CONNECTION: &str = "memory://";

/// Открыть store для ресурса: один пул на экземпляр ресурса.
pub fn open_store(connection: &str) -> Result<Arc<dyn RowStore>, PluginError> {
    if connection == MEMORY_CONNECTION {
        tracing::warn!("using in-memory store, nothing will be persisted");
        return Ok(Arc::new(MemoryStore::default()));
    }
    Ok(Arc::new(MySqlGateway::open(connection)?))
}

/// Создать `mysql-table` ресурс.
///
/// Порядок setup'а: конфигурация → кодировка → соединение. Любая
/// ошибка здесь не доходит до потока записей.
pub fn open_table_sink(config: &ResourceConfig) -> Result<IngestionSink, PipelineError> {
    config.validate(ResourceKind::Table)?;
    let decoder = decoder_for(&config.encoding)?;
    let store = open_store(&config.connection)?;
    let sink = IngestionSink::from_parts(config, decoder, store);
    tracing::info!(
        resource = %ResourceKind::Table,
        table = %config.table,
        fields = ?config.fields,
        encoding = %config.encoding,
        chunk_size = config.insert_chunk_size,
        "opened resource"
    );
    Ok(sink)
}

/// Создать `mysql-filter` ресурс. Порядок setup'а тот же, что у sink'а.
pub fn open_filter(config: &ResourceConfig) -> Result<DedupGate, PipelineError> {
    config.validate(ResourceKind::Filter)?;
    let decoder = decoder_for(&config.encoding)?;
    let store = open_store(&config.connection)?;
    let gate = DedupGate::from_parts(config, decoder, store);
    tracing::info!(
        resource = %ResourceKind::Filter,
        table = %config.table,
        key_field = %config.fields[0],
        encoding = %config.encoding,
        "opened resource"
    );
    Ok(gate)
}
