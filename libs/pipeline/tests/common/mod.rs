#![allow(dead_code)]

use std::collections::VecDeque;

use rowgate_api::{PluginFuture, RecordStream};
use rowgate_pipeline::config::ResourceConfig;

/// Конечный поток из заранее заданных записей.
pub struct VecStream {
    records: VecDeque<Vec<u8>>,
    pub reads: usize,
}

impl VecStream {
    pub fn new<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        Self {
            records: records.into_iter().map(|r| r.as_ref().to_vec()).collect(),
            reads: 0,
        }
    }
}

impl RecordStream for VecStream {
    fn recv(&mut self) -> PluginFuture<'_, Option<Vec<u8>>> {
        Box::pin(async move {
            self.reads += 1;
            self.records.pop_front()
        })
    }
}

pub fn config(table: &str, fields: &[&str]) -> ResourceConfig {
    ResourceConfig::new(
        "memory://",
        table,
        fields.iter().map(|f| f.to_string()).collect(),
    )
}

pub fn user(id: i64) -> Vec<u8> {
    format!(r#"{{"id": {id}, "name": "user-{id}"}}"#).into_bytes()
}
