use std::sync::Arc;

use rowgate_api::{Decoder, PluginError, RowStore};

use crate::PipelineError;
use crate::config::{ResourceConfig, ResourceKind};
use crate::encoding::decoder_for;
use crate::statement::exists_statement;

/// Deduplication gate (`mysql-filter`).
///
/// Вызывается хостом отдельно для каждой записи; ошибка относится
/// только к этой записи, соседние вызовы не затрагиваются. Собственного
/// состояния нет, кроме общего store.
pub struct DedupGate {
    name: String,
    key_field: String,
    statement: String,
    decoder: Arc<dyn Decoder>,
    store: Arc<dyn RowStore>,
}

impl DedupGate {
    /// Build a gate over an already opened store.
    pub fn new(config: &ResourceConfig, store: Arc<dyn RowStore>) -> Result<Self, PipelineError> {
        config.validate(ResourceKind::Filter)?;
        let decoder = decoder_for(&config.encoding)?;
        Ok(Self::from_parts(config, decoder, store))
    }

    /// Config must already be validated for `ResourceKind::Filter`.
    pub(crate) fn from_parts(
        config: &ResourceConfig,
        decoder: Arc<dyn Decoder>,
        store: Arc<dyn RowStore>,
    ) -> Self {
        let key_field = config.fields[0].clone();
        Self {
            name: format!("{}/{}", ResourceKind::Filter, config.table),
            statement: exists_statement(&config.table, &key_field),
            key_field,
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

    /// Отфильтровать одну запись.
    ///
    /// - count 0 → `Some(record)`: исходные байты без изменений;
    /// - count 1 → `None`: запись уже сохранена, дальше не идёт;
    /// - иначе → Invariant ошибка, count не угадывается.
    ///
    /// Если ключевого поля в записи нет, в запрос уходит NULL; `= NULL`
    /// не совпадает ни с одной строкой, и запись проходит.
    pub async fn filter(&self, record: &[u8]) -> Result<Option<Vec<u8>>, PluginError> {
        let decoded = self.decoder.decode(record)?;
        let key = decoded.get_or_null(&self.key_field);
        if key.is_null() {
            tracing::debug!(gate = %self.name, field = %self.key_field, "record has no key value");
        }

        let count = self.store.count_where(&self.statement, &key).await?;
        match count {
            1 => {
                tracing::debug!(gate = %self.name, %key, "already stored, suppressing");
                Ok(None)
            }
            0 => Ok(Some(record.to_vec())),
            n => {
                tracing::error!(gate = %self.name, %key, count = n, "unexpected existence count");
                Err(PluginError::invariant(format!("unexpected existence count: {n}")))
            }
        }
    }

    /// Освободить store. Gate после этого не используется.
    pub async fn close(self) {
        self.store.close().await;
        tracing::info!(gate = %self.name, "closed");
    }
}
