use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use rowgate_pipeline::framing::LinesFraming;
use rowgate_pipeline::{DrainOutcome, open_table_sink, record_channel, spawn_sink_task};

use crate::config::RunArgs;
use crate::error::CliError;
use crate::input::{OverLongLine, cancel_on_ctrl_c, spawn_reader};

pub async fn run(args: RunArgs) -> Result<(), CliError> {
    tracing::info!(config = %args.config, "rowgate table starting");

    let config = args.load()?;
    let sink = open_table_sink(&config)?;
    let name = sink.name().to_string();

    let token = CancellationToken::new();
    cancel_on_ctrl_c(token.clone());

    let (tx, stream) = record_channel(args.buffer.max(1));
    let reader = spawn_reader(
        tokio::io::stdin(),
        LinesFraming::new(args.max_line),
        OverLongLine::Fail,
        tx,
        token.clone(),
    );

    let (err_tx, mut err_rx) = mpsc::channel(1);
    let handle = spawn_sink_task(sink, stream, err_tx);

    // Канал ошибок закрывается ровно один раз, с ошибкой или без
    while let Some(e) = err_rx.recv().await {
        tracing::error!(sink = %name, kind = %e.kind(), error = %e, "sink failed");
    }
    let outcome = handle.await?;

    // Sink мог остановиться раньше EOF, reader больше не нужен
    token.cancel();
    let read = reader.await?;

    match outcome {
        DrainOutcome::Drained { records, rows_affected } => {
            let read = read?;
            tracing::info!(sink = %name, read = read.sent, records, rows_affected, "done");
            Ok(())
        }
        DrainOutcome::Failed { records, error } => {
            tracing::info!(sink = %name, records, "stopped on error");
            Err(error.into())
        }
    }
}
