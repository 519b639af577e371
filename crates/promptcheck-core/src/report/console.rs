use crate::model::ResultRow;
use std::sync::Arc;

/// Callback invoked for each finished row.
pub type RowSink = Arc<dyn Fn(&ResultRow) + Send + Sync>;

/// One line per case: domain, id, input, output and check outcomes.
#[must_use]
pub fn format_case_line(row: &ResultRow) -> String {
    let checks = row
        .checks
        .entries()
        .iter()
        .map(|c| {
            let mark = match (c.verified, c.passed) {
                (false, _) => "?",
                (true, true) => "ok",
                (true, false) => "FAIL",
            };
            format!("{}={}", c.name, mark)
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "[{} | {}] User: {} | Bot: {} | Checks: {}",
        row.domain.to_uppercase(),
        row.case_id,
        one_line(&row.input),
        one_line(&row.output),
        checks
    )
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prints each row's line to stdout as the run proceeds.
pub fn default_row_sink() -> RowSink {
    Arc::new(|row: &ResultRow| println!("{}", format_case_line(row)))
}

/// Run header printed before the first case.
pub fn print_run_header(
    env: &str,
    model: &str,
    region: &str,
    profile: Option<&str>,
    cases: usize,
    domains: &[String],
    out_dir: &std::path::Path,
) {
    println!(
        "[config] env={} model={} region={} profile={}\n",
        env,
        model,
        region,
        profile.unwrap_or("-")
    );
    println!("Cases: {} | Domains: {}", cases, domains.join(", "));
    println!("Saving results to: {}\n", out_dir.display());
}
