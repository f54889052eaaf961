mod document;
mod grid;
mod ipc;
mod schedule;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use serde_json::json;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // stdout carries protocol frames; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "coteacherd ready");

    let mut state = ipc::AppState::default();
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&mut state, stdin.lock(), stdout.lock())
}

fn serve(
    state: &mut ipc::AppState,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't echo an id we failed to parse; answer best-effort.
                warn!(error = %e, "dropping malformed request line");
                let resp = json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                writeln!(output, "{}", resp).context("failed to write response")?;
                output.flush()?;
                continue;
            }
        };

        let resp = ipc::handle_request(state, req);
        writeln!(
            output,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        )
        .context("failed to write response")?;
        output.flush()?;
    }

    Ok(())
}
