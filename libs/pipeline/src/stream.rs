use tokio::sync::mpsc;

use rowgate_api::{PluginFuture, RecordStream};

// ═══════════════════════════════════════════════════════════════
//  ChannelStream — host-side RecordStream impl
// ═══════════════════════════════════════════════════════════════

/// Поток записей поверх bounded mpsc канала. Поток исчерпан, когда
/// все отправители закрыты.
pub struct ChannelStream {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelStream {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self { rx }
    }
}

impl RecordStream for ChannelStream {
    fn recv(&mut self) -> PluginFuture<'_, Option<Vec<u8>>> {
        Box::pin(async move { self.rx.recv().await })
    }
}

/// Канал: хост пишет записи в sender, consumer читает ChannelStream.
pub fn record_channel(buffer: usize) -> (mpsc::Sender<Vec<u8>>, ChannelStream) {
    let (tx, rx) = mpsc::channel(buffer);
    (tx, ChannelStream::new(rx))
}
