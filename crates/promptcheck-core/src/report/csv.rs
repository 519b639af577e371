use crate::model::ResultRow;
use std::path::Path;

pub const COLUMNS: [&str; 10] = [
    "timestamp",
    "env",
    "model_id",
    "domain",
    "prompt_file",
    "case_id",
    "input",
    "output",
    "checks",
    "unverified_traits",
];

/// Fixed-column table; `checks` holds the JSON object, `unverified_traits` is `;`-joined.
pub fn write_csv(rows: &[ResultRow], out: &Path) -> anyhow::Result<()> {
    let mut w = ::csv::Writer::from_path(out)?;
    w.write_record(COLUMNS)?;
    for r in rows {
        let checks = r.checks.to_json_string();
        let unverified = r.unverified_traits.join(";");
        w.write_record([
            r.timestamp.as_str(),
            r.env.as_str(),
            r.model_id.as_str(),
            r.domain.as_str(),
            r.prompt_file.as_str(),
            r.case_id.as_str(),
            r.input.as_str(),
            r.output.as_str(),
            checks.as_str(),
            unverified.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
