use std::io;

use serde_json::Value;

use super::format::{self, field_str};

pub fn render_import_run(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("import output requires summary"))?;

    let mut lines = vec![if dry_run {
        "Dry-run validation completed successfully.".to_string()
    } else {
        "Import completed successfully.".to_string()
    }];
    lines.push(String::new());
    lines.push("Summary:".to_string());

    let mut entries = Vec::new();
    if !dry_run {
        entries.push(("Import ID:", field_str(data, "import_id").to_string()));
    }
    entries.push(("Source:", field_str(data, "source_used").to_string()));
    entries.push(("Rows read:", count(summary, "rows_read")));
    entries.push(("Rows valid:", count(summary, "rows_valid")));
    entries.push(("Rows invalid:", count(summary, "rows_invalid")));
    entries.push(("Inserted:", count(summary, "inserted")));
    lines.extend(format::key_value_rows(&entries, 2));

    lines.push(String::new());
    if dry_run {
        lines.push("No expenses were written because this was a dry run.".to_string());
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push("  Rerun without --dry-run to import these rows.".to_string());
    } else {
        lines.push("What to do next:".to_string());
        lines.push("  pocketplan expense list".to_string());
        lines.push("  pocketplan budget".to_string());
    }

    Ok(lines.join("\n"))
}

fn count(summary: &Value, key: &str) -> String {
    summary
        .get(key)
        .and_then(Value::as_i64)
        .unwrap_or(0)
        .to_string()
}
