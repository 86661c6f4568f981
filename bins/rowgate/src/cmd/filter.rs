use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use rowgate_api::RecordStream;
use rowgate_pipeline::framing::LinesFraming;
use rowgate_pipeline::{open_filter, record_channel};

use crate::config::RunArgs;
use crate::error::CliError;
use crate::input::{OverLongLine, cancel_on_ctrl_c, spawn_reader};

#[derive(Debug, Default)]
struct FilterStats {
    passed: u64,
    suppressed: u64,
    failed: u64,
}

pub async fn run(args: RunArgs) -> Result<(), CliError> {
    tracing::info!(config = %args.config, "rowgate filter starting");

    let config = args.load()?;
    let gate = open_filter(&config)?;

    let token = CancellationToken::new();
    cancel_on_ctrl_c(token.clone());

    let (tx, mut stream) = record_channel(args.buffer.max(1));
    // Слишком длинная строка: ошибка одной записи, как и у gate'а
    let reader = spawn_reader(
        tokio::io::stdin(),
        LinesFraming::new(args.max_line),
        OverLongLine::Skip,
        tx,
        token.clone(),
    );

    let framing = LinesFraming::new(0);
    let mut stdout = tokio::io::stdout();
    let mut out = Vec::with_capacity(8192);
    let mut stats = FilterStats::default();

    // Ошибка одной записи не останавливает остальные
    while let Some(record) = stream.recv().await {
        match gate.filter(&record).await {
            Ok(Some(pass)) => {
                out.clear();
                framing.encode(&pass, &mut out);
                stdout.write_all(&out).await?;
                stdout.flush().await?;
                stats.passed += 1;
            }
            Ok(None) => stats.suppressed += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::error!(gate = %gate.name(), kind = %e.kind(), error = %e, "record failed");
            }
        }
    }

    gate.close().await;
    let read = reader.await??;
    stats.failed += read.skipped;

    if stats.failed > 0 {
        tracing::warn!(failed = stats.failed, "some records failed");
    }
    tracing::info!(
        read = read.sent + read.skipped,
        passed = stats.passed,
        suppressed = stats.suppressed,
        failed = stats.failed,
        "done"
    );
    Ok(())
}
