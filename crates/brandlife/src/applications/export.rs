use std::io::Write;

use chrono::{DateTime, Utc};

use super::domain::ApplicationRecord;

pub const EXPORT_FILE_NAME: &str = "applications.csv";

const HEADER: [&str; 13] = [
    "Name",
    "Email",
    "Phone",
    "Company",
    "Revenue",
    "Budget",
    "Timeline",
    "Challenges",
    "Goals",
    "Status",
    "Submitted At",
    "Reviewed At",
    "Notes",
];

/// Writes records as RFC 4180 CSV. Fields holding a comma, quote or line
/// break are quoted with embedded quotes doubled.
pub fn write_csv<W: Write>(records: &[ApplicationRecord], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for record in records {
        let submitted_at = format_timestamp(record.submitted_at);
        let reviewed_at = record.reviewed_at.map(format_timestamp).unwrap_or_default();
        csv_writer.write_record([
            record.name.as_str(),
            record.email.as_str(),
            record.phone.as_deref().unwrap_or_default(),
            record.company.as_str(),
            record.revenue.label(),
            record.budget.label(),
            record.timeline.label(),
            record.challenges.as_str(),
            record.goals.as_str(),
            record.status.label(),
            submitted_at.as_str(),
            reviewed_at.as_str(),
            record.notes.as_deref().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Renders records into an in-memory CSV document.
pub fn to_csv_bytes(records: &[ApplicationRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
