use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;

use rowgate_api::{PluginError, PluginFuture, RowStore, Value};

// ═══════════════════════════════════════════════════════════════
//  WriteCall
// ═══════════════════════════════════════════════════════════════

/// Один исполненный write: текст statement'а и привязанные параметры.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub statement: String,
    pub values: Vec<Value>,
}

fn default_max_records() -> usize {
    100_000
}

// ═══════════════════════════════════════════════════════════════
//  MemoryStore
// ═══════════════════════════════════════════════════════════════

/// In-memory RowStore. Для dry run'ов без базы и для тестов протокола
/// sink/gate: запоминает каждый write, отдаёт заранее заданные
/// existence count'ы и умеет имитировать отказ backend'а.
pub struct MemoryStore {
    writes: RwLock<VecDeque<WriteCall>>,
    max_records: usize,
    write_calls: RwLock<usize>,
    /// Ключ (Display значения) → count, который вернёт count_where.
    counts: RwLock<HashMap<String, i64>>,
    missing_rows: RwLock<bool>,
    /// Номер write'а (с 1), начиная с которого backend "падает".
    fail_from: RwLock<Option<usize>>,
    count_calls: RwLock<VecDeque<(String, Value)>>,
    closed: RwLock<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(default_max_records())
    }
}

impl MemoryStore {
    pub fn new(max_records: usize) -> Self {
        Self {
            writes: RwLock::new(VecDeque::with_capacity(max_records.min(65536))),
            max_records,
            write_calls: RwLock::new(0),
            counts: RwLock::new(HashMap::new()),
            missing_rows: RwLock::new(false),
            fail_from: RwLock::new(None),
            count_calls: RwLock::new(VecDeque::new()),
            closed: RwLock::new(0),
        }
    }

    /// Задать existence count для ключа. Незаданные ключи дают 0.
    pub async fn set_count(&self, key: &Value, count: i64) {
        self.counts.write().await.insert(key.to_string(), count);
    }

    /// count_where будет вести себя как агрегат, не вернувший ни одной строки.
    pub async fn set_missing_rows(&self, missing: bool) {
        *self.missing_rows.write().await = missing;
    }

    /// Write номер `n` (с 1) и все последующие завершатся storage ошибкой.
    pub async fn fail_writes_from(&self, n: usize) {
        *self.fail_from.write().await = Some(n);
    }

    /// Успешные write'ы в порядке исполнения (не больше max_records последних).
    pub async fn writes(&self) -> Vec<WriteCall> {
        self.writes.read().await.iter().cloned().collect()
    }

    /// Все попытки write, включая неуспешные.
    pub async fn write_attempts(&self) -> usize {
        *self.write_calls.read().await
    }

    /// Запросы count_where (statement, key), не больше max_records последних.
    pub async fn count_calls(&self) -> Vec<(String, Value)> {
        self.count_calls.read().await.iter().cloned().collect()
    }

    pub async fn close_calls(&self) -> usize {
        *self.closed.read().await
    }
}

impl RowStore for MemoryStore {
    fn write<'a>(&'a self, statement: &'a str, values: &'a [Value]) -> PluginFuture<'a, Result<u64, PluginError>> {
        Box::pin(async move {
            let attempt = {
                let mut calls = self.write_calls.write().await;
                *calls += 1;
                *calls
            };
            if let Some(n) = *self.fail_from.read().await {
                if attempt >= n {
                    return Err(PluginError::storage(format!(
                        "memory store: injected failure on write #{attempt}"
                    )));
                }
            }

            let mut buf = self.writes.write().await;
            if buf.len() >= self.max_records {
                buf.pop_front();
            }
            buf.push_back(WriteCall {
                statement: statement.to_string(),
                values: values.to_vec(),
            });
            tracing::trace!(attempt, params = values.len(), "memory write");
            Ok(1)
        })
    }

    fn count_where<'a>(&'a self, statement: &'a str, key: &'a Value) -> PluginFuture<'a, Result<i64, PluginError>> {
        Box::pin(async move {
            {
                let mut calls = self.count_calls.write().await;
                if calls.len() >= self.max_records {
                    calls.pop_front();
                }
                calls.push_back((statement.to_string(), key.clone()));
            }
            if *self.missing_rows.read().await {
                return Err(PluginError::invariant(format!(
                    "existence query returned no rows: {statement}"
                )));
            }
            Ok(self.counts.read().await.get(&key.to_string()).copied().unwrap_or(0))
        })
    }

    fn close(&self) -> PluginFuture<'_, ()> {
        Box::pin(async move {
            *self.closed.write().await += 1;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgate_api::ErrorKind;

    #[tokio::test]
    async fn keeps_last_max_records_writes() {
        let store = MemoryStore::new(2);
        for i in 0..3 {
            store.write("INSERT", &[Value::Int(i)]).await.unwrap();
        }
        let writes = store.writes().await;
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].values, vec![Value::Int(1)]);
        assert_eq!(store.write_attempts().await, 3);
    }

    #[tokio::test]
    async fn injected_failures_start_at_the_given_write() {
        let store = MemoryStore::default();
        store.fail_writes_from(2).await;
        assert!(store.write("INSERT", &[]).await.is_ok());
        let err = store.write("INSERT", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(store.writes().await.len(), 1);
    }

    #[tokio::test]
    async fn scripted_counts_default_to_zero() {
        let store = MemoryStore::default();
        store.set_count(&Value::from("a"), 1).await;
        assert_eq!(store.count_where("SELECT", &Value::from("a")).await.unwrap(), 1);
        assert_eq!(store.count_where("SELECT", &Value::from("b")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn count_log_is_bounded_like_writes() {
        let store = MemoryStore::new(2);
        for key in ["a", "b", "c"] {
            store.count_where("SELECT", &Value::from(key)).await.unwrap();
        }
        let calls = store.count_calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, Value::from("b"));
        assert_eq!(calls[1].1, Value::from("c"));
    }
}
