//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::Utf8Path;

pub mod ads;
pub mod info;
pub mod length;
pub mod pmax;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read all of stdin, failing once more than `max_bytes` have arrived.
pub fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let mut bytes = Vec::new();
    let stdin = std::io::stdin().lock();
    let cap = max_bytes.map_or(u64::MAX, |max| {
        u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1)
    });
    stdin
        .take(cap)
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    if let Some(max) = max_bytes
        && bytes.len() > max
    {
        anyhow::bail!("input too large: stdin exceeds {max} bytes");
    }
    String::from_utf8(bytes).context("stdin is not valid UTF-8")
}

/// Read from `path`, or from stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Utf8Path>, max_bytes: Option<usize>) -> anyhow::Result<String> {
    match path {
        Some(p) if p.as_str() != "-" => read_input_file(p, max_bytes),
        _ => read_stdin(max_bytes),
    }
}
