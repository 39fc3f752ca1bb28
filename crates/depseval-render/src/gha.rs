use crate::RenderableReport;

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = f.severity.workflow_command();

        let mut meta = String::new();
        if let Some(site) = &f.site {
            meta.push_str(&format!("file={}", escape_property(&site.manifest)));
            if let Some(line) = site.line {
                meta.push_str(&format!(",line={line}"));
            }
        }

        let message = escape_data(&format!("[{}:{}] {}", f.check_id, f.code, f.message));

        if meta.is_empty() {
            out.push(format!("::{level}::{message}"));
        } else {
            out.push(format!("::{level} {meta}::{message}"));
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

// Property values additionally reserve `:` and `,`.
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
