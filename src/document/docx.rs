use crate::error::{PdaError, Result};
use std::path::Path;

/// Paragraph and table text of a DOCX file, one paragraph per line.
pub fn extract_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    extract_from_bytes(&bytes)
}

pub fn extract_from_bytes(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| PdaError::Extraction(format!("DOCX parse error: {e}")))?;

    let mut lines: Vec<String> = Vec::new();

    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => {
                lines.push(paragraph_text(paragraph));
            }
            docx_rs::DocumentChild::Table(table) => {
                lines.extend(table_rows(table));
            }
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut content = String::new();
    for para_child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = para_child {
            for run_child in &run.children {
                match run_child {
                    docx_rs::RunChild::Text(text) => content.push_str(&text.text),
                    docx_rs::RunChild::Tab(_) => content.push('\t'),
                    _ => {}
                }
            }
        }
    }
    content
}

/// Each table row as tab separated cell text.
fn table_rows(table: &docx_rs::Table) -> Vec<String> {
    let mut rows = Vec::new();

    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let mut cells = Vec::new();
        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let text = cell
                .children
                .iter()
                .filter_map(|c| match c {
                    docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            cells.push(text.trim().to_string());
        }
        rows.push(cells.join("\t"));
    }

    rows
}
