use rowsift_workbook::ResultsView;
use std::fmt::Write as _;

/// Plain-text table: status line, header row, one line per displayed row
/// prefixed with its display index, then the truncation notice.
pub fn render_text(view: &ResultsView) -> String {
    let mut out = String::new();
    if view.total == 0 {
        out.push_str("Совпадений не найдено\n");
        return out;
    }
    let _ = writeln!(out, "{}", view.status_line());

    let labels: Vec<&str> = view.headers.iter().map(|h| h.label.as_str()).collect();
    let _ = writeln!(out, "#\t{}", labels.join("\t"));
    for row in &view.rows {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        let _ = writeln!(out, "{}\t{}", row.display_index + 1, cells.join("\t"));
    }
    if let Some(notice) = view.truncation_notice() {
        let _ = writeln!(out, "{notice}");
    }
    out
}
