use crate::model::ResultRow;
use std::fmt::Write as _;
use std::path::Path;

#[must_use]
pub fn render_markdown(rows: &[ResultRow]) -> String {
    let mut md = String::new();
    for r in rows {
        let _ = writeln!(md, "### {} | {}\n", r.case_id, r.domain);
        let _ = writeln!(md, "**Timestamp:** {}  ", r.timestamp);
        let _ = writeln!(md, "**Env:** `{}`  ", r.env);
        let _ = writeln!(md, "**Prompt file:** `{}`  ", r.prompt_file);
        let _ = writeln!(md, "**Model:** `{}`  ", r.model_id);
        let _ = writeln!(md, "**Input:** {}\n", r.input);
        let _ = writeln!(md, "**Output:** {}\n", r.output);
        let _ = writeln!(md, "**Checks:** `{}`\n", r.checks.to_json_string());
        if !r.unverified_traits.is_empty() {
            let _ = writeln!(
                md,
                "**Unverified (human scoring required):** {}\n",
                r.unverified_traits.join(", ")
            );
        }
        md.push_str("---\n\n");
    }
    md
}

pub fn write_markdown(rows: &[ResultRow], out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, render_markdown(rows))?;
    Ok(())
}
