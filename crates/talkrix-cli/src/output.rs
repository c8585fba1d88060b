use talkrix_core::pagination::PageMarker;
use talkrix_core::Paginator;

/// Plain-text table with left-aligned columns sized to their widest cell.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Page-number strip: numbers, `…` gaps and the current page in brackets.
pub fn page_strip(paginator: &Paginator) -> String {
    paginator
        .window()
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if page == paginator.current_page() => format!("[{page}]"),
            PageMarker::Page(page) => page.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Showing 41 to 45 of 45 results", or nothing when the list is empty.
pub fn showing_line(paginator: &Paginator) -> Option<String> {
    if paginator.total_items() == 0 {
        return None;
    }
    let range = paginator.item_range();
    Some(format!(
        "Showing {} to {} of {} results",
        range.start,
        range.end,
        paginator.total_items()
    ))
}

/// Footer under a paged list: the strip only when there is more than one page.
pub fn page_footer(paginator: &Paginator) -> String {
    let mut parts = Vec::new();
    if let Some(showing) = showing_line(paginator) {
        parts.push(showing);
    }
    if paginator.shows_controls() {
        parts.push(format!("Page {}", page_strip(paginator)));
    }
    parts.join("  |  ")
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn paginator(per_page: usize, total: usize, page: usize) -> Paginator {
        let mut paginator = Paginator::new(per_page);
        paginator.set_total_items(total);
        paginator.go_to(page);
        paginator
    }

    #[test]
    fn strip_marks_current_page() {
        assert_eq!(page_strip(&paginator(10, 100, 5)), "1 … 4 [5] 6 … 10");
        assert_eq!(page_strip(&paginator(10, 60, 3)), "1 2 [3] 4 5 6");
    }

    #[test]
    fn footer_hides_strip_for_single_page() {
        assert_eq!(page_footer(&paginator(20, 7, 1)), "Showing 1 to 7 of 7 results");
        assert_eq!(
            page_footer(&paginator(20, 45, 3)),
            "Showing 41 to 45 of 45 results  |  Page 1 2 [3]"
        );
        assert_eq!(page_footer(&paginator(20, 0, 1)), "");
    }

    #[test]
    fn table_aligns_columns() {
        let mut table = Table::new(vec!["ID", "Name"]);
        table.row(vec!["a1".to_string(), "Support".to_string()]);
        table.row(vec!["agent-22".to_string(), "Sales".to_string()]);
        assert_eq!(
            table.render(),
            "ID        Name\n--------  -------\na1        Support\nagent-22  Sales\n"
        );
    }

    #[test]
    fn helpers_format_cells() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(duration(125), "2:05");
        assert_eq!(or_dash(Some("")), "-");
    }
}
