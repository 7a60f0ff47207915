// Export sinks for finished runs

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use listgrab_scanner::result::{FieldValue, Record, RunResult};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
    Xlsx,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "text" | "txt" => Some(ExportFormat::Text),
            "xlsx" | "excel" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Render a run in the requested format. Workbooks are binary and only go
/// through [`export_to_path`].
pub fn render(result: &RunResult, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => render_csv(result),
        ExportFormat::Json => render_json(result).context("failed to serialize run as JSON"),
        ExportFormat::Text => Ok(render_text(result)),
        ExportFormat::Xlsx => bail!("xlsx exports must be written to a file"),
    }
}

/// Write a run to `path` in any format
pub fn export_to_path(result: &RunResult, format: ExportFormat, path: &Path) -> Result<()> {
    match format {
        ExportFormat::Xlsx => write_xlsx(result, path),
        _ => save_export(&render(result, format)?, path),
    }
}

/// Flat cell content for tabular sinks. Lists become JSON arrays so items
/// containing commas stay distinguishable.
pub fn cell_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::List(items) => {
            serde_json::to_string(items).unwrap_or_else(|_| items.join(", "))
        }
    }
}

fn row_cells(fields: &[String], record: &Record) -> Vec<String> {
    fields
        .iter()
        .map(|field| record.get(field).map(cell_value).unwrap_or_default())
        .collect()
}

/// Metadata lines shared by the CSV header comment and the text export.
fn summary_lines(result: &RunResult) -> Vec<String> {
    let meta = &result.metadata;
    vec![
        "Listgrab Summary".to_string(),
        format!("- Site: {}", meta.site_name),
        format!("- URL: {}", meta.source_url),
        format!("- Pages Requested: {}", meta.pages_requested),
        format!("- Pages Scraped: {}", meta.pages_fetched),
        format!("- Fields: {}", result.fields.join(", ")),
        format!("- Date: {}", meta.finished_at.format("%Y-%m-%d %H:%M:%S")),
        format!("- Total items: {}", meta.total_records),
        format!("- Stop reason: {}", meta.stop_reason.as_str()),
    ]
}

/// CSV with the run summary as `# ` comment lines above the header row.
/// Data cells starting with `#` are quoted so comment-aware readers keep them.
pub fn render_csv(result: &RunResult) -> Result<String> {
    let mut buf = Vec::new();
    for line in summary_lines(result) {
        writeln!(buf, "# {}", line)?;
    }

    {
        let mut writer = csv::WriterBuilder::new()
            .comment(Some(b'#'))
            .from_writer(&mut buf);
        writer.write_record(&result.fields)?;
        for record in &result.records {
            writer.write_record(row_cells(&result.fields, record))?;
        }
        writer.flush().context("failed to flush CSV rows")?;
    }

    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

pub fn render_json(result: &RunResult) -> Result<String, serde_json::Error> {
    let meta = &result.metadata;
    let json_export = serde_json::json!({
        "metadata": {
            "generator": "Listgrab",
            "version": env!("CARGO_PKG_VERSION"),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "site_name": meta.site_name,
            "source_url": meta.source_url,
            "pages_requested": meta.pages_requested,
            "pages_fetched": meta.pages_fetched,
            "total_records": meta.total_records,
            "started_at": meta.started_at.to_rfc3339(),
            "finished_at": meta.finished_at.to_rfc3339(),
            "stop_reason": meta.stop_reason,
            "pages": result.pages,
        },
        "fields": result.fields,
        "records": result.records,
    });

    serde_json::to_string_pretty(&json_export)
}

pub fn render_text(result: &RunResult) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    for line in summary_lines(result) {
        report.push_str(&line);
        report.push('\n');
    }
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for page in &result.pages {
        match &page.error {
            Some(error) => report.push_str(&format!(
                "  page {} SKIPPED {} ({} attempts: {})\n",
                page.index, page.url, page.attempts, error
            )),
            None => report.push_str(&format!(
                "  page {} {} {} ({} listings)\n",
                page.index, page.status_code, page.url, page.containers_found
            )),
        }
    }
    if !result.pages.is_empty() {
        report.push('\n');
    }

    let width = result.fields.iter().map(String::len).max().unwrap_or(0);
    for (idx, record) in result.records.iter().enumerate() {
        report.push_str(&format!("[{}]\n", idx + 1));
        for (name, value) in record.iter() {
            report.push_str(&format!("  {:width$}  {}\n", name, value, width = width));
        }
        report.push('\n');
    }

    report
}

/// `<site_name>_<YYYYmmdd_HHMMSS>.<ext>`, with the site name reduced to
/// filename-safe characters.
pub fn default_filename(site_name: &str, format: ExportFormat, at: DateTime<Local>) -> String {
    let safe: String = site_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let base = if safe.is_empty() { "scraped_data" } else { safe.as_str() };
    format!("{}_{}.{}", base, at.format("%Y%m%d_%H%M%S"), format.extension())
}

/// Workbook with a "Listings" data sheet and a "Documentation" sheet
/// carrying the run summary.
pub fn write_xlsx(result: &RunResult, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let listings = workbook.add_worksheet().set_name("Listings")?;
    for (col, field) in result.fields.iter().enumerate() {
        listings.write_string_with_format(0, col as u16, field, &bold)?;
    }
    for (row, record) in result.records.iter().enumerate() {
        for (col, cell) in row_cells(&result.fields, record).iter().enumerate() {
            listings.write_string(row as u32 + 1, col as u16, cell)?;
        }
    }

    let docs = workbook.add_worksheet().set_name("Documentation")?;
    docs.write_string_with_format(0, 0, "Info", &bold)?;
    for (row, line) in summary_lines(result).iter().enumerate() {
        docs.write_string(row as u32 + 1, 0, line)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

pub fn save_export(content: &str, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
