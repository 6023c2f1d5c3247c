//! Output formatting utilities

use clap::ValueEnum;
use lenskit_core::Record;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Format records based on format type
pub fn format_records(records: &[Record], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Table => Ok(records_table(records)),
    }
}

fn records_table(records: &[Record]) -> String {
    let rows: Vec<(String, String, String)> = records
        .iter()
        .map(|r| {
            let fields = r
                .fields
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join(" ");
            (r.record_type.to_string(), r.pk.to_string(), fields)
        })
        .collect();

    let model_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0).max(5);
    let pk_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).max(2);

    let mut lines = vec![format!("{:<model_width$}  {:<pk_width$}  FIELDS", "MODEL", "PK")];
    for (model, pk, fields) in rows {
        let line = format!("{:<model_width$}  {:<pk_width$}  {}", model, pk, fields);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenskit_core::RecordType;

    #[test]
    fn test_table_aligns_columns() {
        let item = RecordType::parse("shop.item").unwrap();
        let records = vec![
            Record::new(item.clone(), 1).with_field("label", "i1"),
            Record::new(item, 22),
        ];

        let table = format_records(&records, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "MODEL      PK  FIELDS");
        assert_eq!(lines[1], "shop.item  1   label=\"i1\"");
        assert_eq!(lines[2], "shop.item  22");
    }

    #[test]
    fn test_json_is_fixture_shaped() {
        let records = vec![Record::new(RecordType::parse("shop.item").unwrap(), 1)];
        let value: serde_json::Value =
            serde_json::from_str(&format_records(&records, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value[0]["model"], "shop.item");
        assert_eq!(value[0]["pk"], 1);
    }
}
