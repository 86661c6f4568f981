use std::future::Future;
use std::pin::Pin;

mod error;
mod types;

pub use error::{ErrorKind, PluginError};
pub use types::{DecodedRecord, Value};

/// Boxed future returned by the async plugin traits.
pub type PluginFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ════════════════════════════════════════════════════════════════
//  Format Plugin Traits
// ════════════════════════════════════════════════════════════════

/// Decoder: парсер формата: bytes → DecodedRecord.
///
/// Реализации должны быть stateless: один экземпляр выбирается при
/// setup'е ресурса и используется для всех записей потока.
pub trait Decoder: Send + Sync {
    /// Имя кодировки, под которым decoder зарегистрирован (e.g. "JSON").
    fn encoding(&self) -> &str;

    /// Парсинг: сырые байты записи → имя поля → значение.
    fn decode(&self, data: &[u8]) -> Result<DecodedRecord, PluginError>;
}

// ════════════════════════════════════════════════════════════════
//  Storage Plugin Traits
// ════════════════════════════════════════════════════════════════

/// Storage backend ресурса. Владеет пулом соединений; каждый ресурс
/// открывает свой экземпляр при setup'е и закрывает его при shutdown.
///
/// Текст SQL формирует вызывающий, store только исполняет его с
/// позиционными параметрами.
pub trait RowStore: Send + Sync {
    /// Выполнить insert-подобный statement. Возвращает число затронутых строк.
    /// Ошибки backend'а возвращаются как есть (kind = Storage).
    fn write<'a>(&'a self, statement: &'a str, values: &'a [Value]) -> PluginFuture<'a, Result<u64, PluginError>>;

    /// Выполнить однострочный агрегат `count(*)` с одним параметром.
    fn count_where<'a>(&'a self, statement: &'a str, key: &'a Value) -> PluginFuture<'a, Result<i64, PluginError>>;

    /// Освободить соединения (graceful shutdown).
    fn close(&self) -> PluginFuture<'_, ()>;
}

// ════════════════════════════════════════════════════════════════
//  Stream Traits
// ════════════════════════════════════════════════════════════════

/// Входной поток записей, который хост отдаёт consumer'у.
///
/// Реализуется на стороне хоста (e.g. поверх mpsc receiver). API crate
/// определяет только трейт, без зависимости от tokio.
pub trait RecordStream: Send {
    /// Следующая запись. None = поток исчерпан.
    fn recv(&mut self) -> PluginFuture<'_, Option<Vec<u8>>>;
}

impl<S: RecordStream + ?Sized> RecordStream for &mut S {
    fn recv(&mut self) -> PluginFuture<'_, Option<Vec<u8>>> {
        (**self).recv()
    }
}

impl<S: RecordStream + ?Sized> RecordStream for Box<S> {
    fn recv(&mut self) -> PluginFuture<'_, Option<Vec<u8>>> {
        (**self).recv()
    }
}
