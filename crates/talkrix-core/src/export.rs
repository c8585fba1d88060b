use chrono::NaiveDate;

use crate::models::CallRecord;

const CALL_HEADERS: [&str; 10] = [
    "Call ID",
    "Agent",
    "From",
    "To",
    "Status",
    "Type",
    "Duration (s)",
    "Cost",
    "Started At",
    "Summary",
];

/// Quotes every field and doubles embedded quotes.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn csv_row<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| csv_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn calls_to_csv(calls: &[CallRecord]) -> String {
    let mut lines = Vec::with_capacity(calls.len() + 1);
    lines.push(csv_row(CALL_HEADERS));
    for call in calls {
        lines.push(csv_row([
            call.id.clone(),
            call.agent_name.clone(),
            call.from_number.clone(),
            call.to_number.clone(),
            call.status.label().to_string(),
            call.call_type.label().to_string(),
            call.duration_seconds.to_string(),
            call.cost.map(|c| format!("{c:.4}")).unwrap_or_default(),
            call.started_at.clone().unwrap_or_default(),
            call.summary.clone().unwrap_or_default(),
        ]));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn call_export_filename(date: NaiveDate) -> String {
    format!("call-history-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::CallStatus;
    use crate::models::CallType;

    fn call(id: &str, summary: Option<&str>) -> CallRecord {
        CallRecord {
            id: id.to_string(),
            agent_name: "Support".to_string(),
            from_number: "+15550001".to_string(),
            to_number: "+15550002".to_string(),
            status: CallStatus::Completed,
            call_type: CallType::Outbound,
            duration_seconds: 61,
            cost: Some(0.125),
            started_at: Some("2026-10-01T10:00:00Z".to_string()),
            summary: summary.map(str::to_string),
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(csv_field(r#"say "hi", then"#), r#""say ""hi"", then""#);
    }

    #[test]
    fn export_has_header_and_one_row_per_call() {
        let csv = calls_to_csv(&[call("c1", Some("Asked \"price\"")), call("c2", None)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"Call ID\",\"Agent\""));
        assert_eq!(
            lines[1],
            r#""c1","Support","+15550001","+15550002","completed","outbound","61","0.1250","2026-10-01T10:00:00Z","Asked ""price""""#
        );
        assert!(lines[2].ends_with(",\"\""));
    }

    #[test]
    fn filename_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(call_export_filename(date), "call-history-2026-10-18.csv");
    }
}
