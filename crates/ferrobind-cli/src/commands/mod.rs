//! Subcommands of the `ferrobind` binary.

pub mod select;
pub mod hypervolume;

use std::path::Path;

use anyhow::Context;
use ferrobind_pareto::CandidateTable;
use tracing::info;

/// Read a candidate table without blocking the runtime on the file read.
pub async fn load_table(path: &Path, id_column: &str, delimiter: u8) -> anyhow::Result<CandidateTable> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read candidate table {}", path.display()))?;
    let table = CandidateTable::from_reader(content.as_bytes(), id_column, delimiter)
        .with_context(|| format!("Failed to parse candidate table {}", path.display()))?;
    info!("Loaded {} candidates from {}", table.len(), path.display());
    Ok(table)
}
