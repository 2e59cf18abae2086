use std::io::{self, Write};

use crate::error::{CliError, CliResult};

/// Prints a response body as indented JSON. Bodies that are not JSON are
/// printed as received.
pub fn print_json_bytes(bytes: &[u8]) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json_bytes(&mut out, bytes).map_err(CliError::Output)
}

pub fn print_json_value(v: &serde_json::Value) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json_value(&mut out, v).map_err(CliError::Output)
}

pub fn write_json_bytes<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(v) => write_json_value(out, &v),
        Err(_) => {
            out.write_all(bytes)?;
            if !bytes.ends_with(b"\n") {
                out.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

fn write_json_value<W: Write>(out: &mut W, v: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, v)?;
    out.write_all(b"\n")
}
