use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use rowgate_pipeline::framing::LinesFraming;

use crate::error::CliError;

/// Что делать со строкой длиннее `--max-line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverLongLine {
    /// Остановить чтение с Decode ошибкой (table: поток прерывается).
    Fail,
    /// Пропустить строку до следующего `\n` и читать дальше (filter).
    Skip,
}

/// Итог чтения входа.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub sent: u64,
    pub skipped: u64,
}

/// Читать newline-framed записи из `reader` в канал ресурса.
///
/// Пустые строки пропускаются. Task завершается на EOF, при отмене
/// `token` или когда получатель закрыт (ресурс остановился).
pub fn spawn_reader<R>(
    mut reader: R,
    framing: LinesFraming,
    policy: OverLongLine,
    tx: mpsc::Sender<Vec<u8>>,
    token: CancellationToken,
) -> JoinHandle<Result<ReadStats, CliError>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::with_capacity(8192);
        let mut tmp = [0u8; 4096];
        let mut stats = ReadStats::default();
        // Внутри пропускаемой строки: ждём её `\n`
        let mut skipping = false;

        loop {
            if skipping {
                match LinesFraming::line_end(&buf) {
                    Some(end) => {
                        buf.drain(..end);
                        skipping = false;
                    }
                    None => buf.clear(),
                }
            }

            while !skipping {
                let frame = match framing.decode(&buf) {
                    Ok(Some((frame, consumed))) => {
                        buf.drain(..consumed);
                        frame
                    }
                    Ok(None) => break,
                    Err(e) if policy == OverLongLine::Skip => {
                        stats.skipped += 1;
                        tracing::error!(record = stats.sent + stats.skipped, error = %e, "record skipped");
                        match LinesFraming::line_end(&buf) {
                            Some(end) => {
                                buf.drain(..end);
                            }
                            None => {
                                buf.clear();
                                skipping = true;
                            }
                        }
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                if frame.is_empty() {
                    continue;
                }
                if tx.send(frame).await.is_err() {
                    tracing::debug!(sent = stats.sent, "record receiver closed, stop reading");
                    return Ok(stats);
                }
                stats.sent += 1;
            }

            let n = tokio::select! {
                n = reader.read(&mut tmp) => n?,
                _ = token.cancelled() => {
                    tracing::info!(sent = stats.sent, "input cancelled");
                    return Ok(stats);
                }
            };
            if n == 0 {
                // Хвост пропускаемой строки отбрасывается целиком
                if !skipping {
                    match framing.decode_eof(&buf) {
                        Ok(Some(last)) => {
                            if tx.send(last).await.is_ok() {
                                stats.sent += 1;
                            }
                        }
                        Ok(None) => {}
                        Err(e) if policy == OverLongLine::Skip => {
                            stats.skipped += 1;
                            tracing::error!(record = stats.sent + stats.skipped, error = %e, "record skipped");
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                tracing::debug!(sent = stats.sent, skipped = stats.skipped, "input exhausted");
                return Ok(stats);
            }
            buf.extend_from_slice(&tmp[..n]);
        }
    })
}

/// Отменить `token` по Ctrl+C.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down...");
            token.cancel();
        }
    });
}
