use crate::model::ResultRow;
use std::path::Path;

pub fn write_json(rows: &[ResultRow], out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(rows)?)?;
    Ok(())
}
