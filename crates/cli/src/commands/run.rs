//! `parkinglot run` — feed commands from a file or stdin to the lot.
//!
//! Each input line is trimmed and handed to the [`LotService`]; text replies
//! go to stdout one per line. Input stops at `exit`, an empty line, or EOF.

use parkinglot_config::AppConfig;
use parkinglot_core::processor::Reply;
use parkinglot_core::service::LotService;
use parkinglot_core::store::LotStore;
use parkinglot_store::NoopStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

pub async fn run(file: Option<PathBuf>, ephemeral: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn LotStore> = if ephemeral {
        Arc::new(NoopStore)
    } else {
        let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
        parkinglot_store::open_from_config(&config).await?
    };
    let service = LotService::open(store).await?;

    let mut stdout = io::stdout();
    let processed = match file {
        Some(path) => {
            let input = tokio::fs::File::open(&path)
                .await
                .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
            drive(&service, BufReader::new(input), &mut stdout).await?
        }
        None => drive(&service, BufReader::new(io::stdin()), &mut stdout).await?,
    };

    debug!(processed, store = service.store_name(), "Input finished");
    Ok(())
}

/// Run every line of `input` through `service`, writing replies to `output`.
///
/// Returns the number of lines that produced a text reply.
pub async fn drive<R, W>(
    service: &LotService,
    input: R,
    output: &mut W,
) -> Result<usize, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut processed = 0;

    while let Some(line) = lines.next_line().await? {
        match service.execute(line.trim()).await? {
            Reply::Text(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
                processed += 1;
            }
            Reply::Exit => break,
        }
    }

    Ok(processed)
}
