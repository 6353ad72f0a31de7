//! The interactive read-evaluate-print loop.
//!
//! One state machine: await a line, process it, repeat. "exit" in any
//! letter-casing (or end of input) terminates without touching the engine.
//! Recoverable per-query failures are logged and the operator is
//! re-prompted; anything else propagates and ends the process.

use std::io::{BufRead, Write};

use docchat_core::traits::AnswerEngine;

pub async fn run<E>(engine: &E, mut input: impl BufRead, mut out: impl Write) -> anyhow::Result<()>
where
    E: AnswerEngine + ?Sized,
{
    loop {
        write!(out, "query> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF behaves like "exit".
            writeln!(out)?;
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            writeln!(out, "👋 Goodbye!")?;
            break;
        }

        match engine.answer(line).await {
            Ok(answer) => {
                writeln!(out, "\n{answer}\n")?;
            }
            Err(e) if e.is_recoverable() => {
                tracing::error!("query failed: {e}");
                writeln!(out, "❌ Query failed: {e}. Try again or type 'exit'.")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
