use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use rowgate_api::{Decoder, PluginError, RecordStream, RowStore, Value};

use crate::PipelineError;
use crate::config::{ResourceConfig, ResourceKind};
use crate::encoding::decoder_for;
use crate::projection::project;
use crate::statement::insert_statement;

// ═══════════════════════════════════════════════════════════════
//  Drain Outcome
// ═══════════════════════════════════════════════════════════════

/// Терминальный результат работы sink'а над одним входным потоком.
#[derive(Debug, Clone, PartialEq)]
pub enum DrainOutcome {
    /// Поток исчерпан без ошибок.
    Drained { records: u64, rows_affected: u64 },
    /// Первая же ошибка декодирования или записи остановила поток.
    /// `records`: сколько записей было сохранено до неё.
    Failed { records: u64, error: PluginError },
}

impl DrainOutcome {
    pub fn is_drained(&self) -> bool {
        matches!(self, DrainOutcome::Drained { .. })
    }

    pub fn error(&self) -> Option<&PluginError> {
        match self {
            DrainOutcome::Drained { .. } => None,
            DrainOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<u64, PluginError> {
        match self {
            DrainOutcome::Drained { records, .. } => Ok(records),
            DrainOutcome::Failed { error, .. } => Err(error),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Ingestion Sink
// ═══════════════════════════════════════════════════════════════

/// Ingestion sink (`mysql-table`): decode → project → INSERT IGNORE.
///
/// Running → (Draining | Failed) → Closed. `drain` потребляет sink,
/// поэтому закрытый sink повторно запустить нельзя; store закрывается
/// ровно один раз при выходе из `drain`.
pub struct IngestionSink {
    name: String,
    table: String,
    fields: Vec<String>,
    chunk_size: usize,
    /// Statement для полного chunk'а (для chunk_size = 1 обычный INSERT).
    statement: String,
    decoder: Arc<dyn Decoder>,
    store: Arc<dyn RowStore>,
}

/// Буфер проецированных строк, ещё не отправленных в store.
struct Pending {
    values: Vec<Value>,
    rows: usize,
}

impl IngestionSink {
    /// Build a sink over an already opened store.
    pub fn new(config: &ResourceConfig, store: Arc<dyn RowStore>) -> Result<Self, PipelineError> {
        config.validate(ResourceKind::Table)?;
        let decoder = decoder_for(&config.encoding)?;
        Ok(Self::from_parts(config, decoder, store))
    }

    /// Config must already be validated for `ResourceKind::Table`.
    pub(crate) fn from_parts(
        config: &ResourceConfig,
        decoder: Arc<dyn Decoder>,
        store: Arc<dyn RowStore>,
    ) -> Self {
        Self {
            name: format!("{}/{}", ResourceKind::Table, config.table),
            table: config.table.clone(),
            fields: config.fields.clone(),
            chunk_size: config.insert_chunk_size,
            statement: insert_statement(&config.table, &config.fields, config.insert_chunk_size),
            decoder,
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Дренировать поток строго по порядку.
    ///
    /// Ошибка декодирования или записи фатальна для всего потока: после
    /// неё ни одна запись не читается. Перед отчётом об ошибке
    /// декодирования буфер chunk'а сбрасывается, так что все предшествующие
    /// корректные записи сохранены.
    pub async fn drain<S: RecordStream>(self, mut stream: S) -> DrainOutcome {
        tracing::info!(sink = %self.name, chunk_size = self.chunk_size, "running");

        let mut pending = Pending {
            values: Vec::with_capacity(self.fields.len() * self.chunk_size),
            rows: 0,
        };
        let mut records: u64 = 0;
        let mut rows_affected: u64 = 0;

        let failure = loop {
            let Some(data) = stream.recv().await else {
                // Draining: хвост неполного chunk'а
                match self.flush(&mut pending).await {
                    Ok((written, affected)) => {
                        records += written;
                        rows_affected += affected;
                        break None;
                    }
                    Err(e) => break Some(e),
                }
            };

            let decoded = match self.decoder.decode(&data) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::error!(sink = %self.name, record = records + pending.rows as u64 + 1, error = ?e, "decode error");
                    match self.flush(&mut pending).await {
                        Ok((written, affected)) => {
                            records += written;
                            rows_affected += affected;
                        }
                        Err(flush_err) => break Some(flush_err),
                    }
                    break Some(e);
                }
            };

            pending.values.extend(project(&self.fields, &decoded));
            pending.rows += 1;

            if pending.rows == self.chunk_size {
                match self.flush(&mut pending).await {
                    Ok((written, affected)) => {
                        records += written;
                        rows_affected += affected;
                    }
                    Err(e) => break Some(e),
                }
            }
        };

        self.store.close().await;

        match failure {
            None => {
                tracing::info!(sink = %self.name, records, rows_affected, "drained");
                DrainOutcome::Drained { records, rows_affected }
            }
            Some(error) => {
                tracing::error!(sink = %self.name, records, error = ?error, "failed");
                DrainOutcome::Failed { records, error }
            }
        }
    }

    /// Записать накопленные строки одним statement'ом.
    /// Возвращает (строк отправлено, строк затронуто).
    async fn flush(&self, pending: &mut Pending) -> Result<(u64, u64), PluginError> {
        if pending.rows == 0 {
            return Ok((0, 0));
        }
        let partial;
        let statement = if pending.rows == self.chunk_size {
            self.statement.as_str()
        } else {
            partial = insert_statement(&self.table, &self.fields, pending.rows);
            partial.as_str()
        };

        let affected = self.store.write(statement, &pending.values).await.map_err(|e| {
            tracing::error!(sink = %self.name, rows = pending.rows, error = ?e, "write error");
            e
        })?;
        tracing::debug!(sink = %self.name, rows = pending.rows, affected, "written");

        let written = pending.rows as u64;
        pending.values.clear();
        pending.rows = 0;
        Ok((written, affected))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Sink task — stream → sink.drain()
// ═══════════════════════════════════════════════════════════════

/// Запустить sink как task хоста.
///
/// `errors` получает не больше одной ошибки и закрывается при выходе
/// из task'а в любом случае; завершение `JoinHandle` служит сигналом
/// completion с итоговым `DrainOutcome`.
pub fn spawn_sink_task<S>(
    sink: IngestionSink,
    stream: S,
    errors: mpsc::Sender<PluginError>,
) -> JoinHandle<DrainOutcome>
where
    S: RecordStream + 'static,
{
    tokio::spawn(async move {
        let name = sink.name().to_string();
        let outcome = sink.drain(stream).await;
        if let Some(e) = outcome.error() {
            if errors.send(e.clone()).await.is_err() {
                tracing::warn!(sink = %name, "error receiver dropped");
            }
        }
        drop(errors);
        tracing::info!(sink = %name, "stopped");
        outcome
    })
}
