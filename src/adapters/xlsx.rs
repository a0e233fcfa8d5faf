//! Minimal OOXML (.xlsx) workbook writer.
//!
//! The package layout mirrors what a spreadsheet reader expects:
//! content types, package relationships, workbook, styles and a single
//! worksheet. Cell text is stored as inline strings, so no shared-string
//! table is needed.

use crate::domain::model::Schedule;
use crate::utils::error::Result;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const SHEET_NAME: &str = "Remote Schedule";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="1"><fill><patternFill patternType="none"/></fill></fills>
  <borders count="1"><border/></borders>
  <cellStyleXfs count="1"><xf/></cellStyleXfs>
  <cellXfs count="1"><xf/></cellXfs>
</styleSheet>"#;

/// Render the schedule as xlsx bytes: one column per day, header row with
/// day labels, one assigned person per body row.
pub fn render_workbook(schedule: &Schedule) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file::<_, ()>("_rels/.rels", FileOptions::default())?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file::<_, ()>("xl/workbook.xml", FileOptions::default())?;
    zip.write_all(workbook_xml().as_bytes())?;

    zip.start_file::<_, ()>("xl/_rels/workbook.xml.rels", FileOptions::default())?;
    zip.write_all(WORKBOOK_RELS.as_bytes())?;

    zip.start_file::<_, ()>("xl/styles.xml", FileOptions::default())?;
    zip.write_all(STYLES.as_bytes())?;

    zip.start_file::<_, ()>("xl/worksheets/sheet1.xml", FileOptions::default())?;
    zip.write_all(sheet_xml(schedule).as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
        escape(SHEET_NAME)
    )
}

fn sheet_xml(schedule: &Schedule) -> String {
    let columns = schedule.days.len();
    let body_rows = schedule
        .days
        .iter()
        .map(|d| d.people.len())
        .max()
        .unwrap_or(0);

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
"#,
    );
    // Fixed column width in place of autosize.
    xml.push_str(&format!(
        "  <cols><col min=\"1\" max=\"{}\" width=\"24\" customWidth=\"1\"/></cols>\n",
        columns.max(1)
    ));
    xml.push_str("  <sheetData>\n");

    xml.push_str("    <row r=\"1\">");
    for (col, day) in schedule.days.iter().enumerate() {
        let mut label = day.header_label();
        if day.holiday {
            label.push_str(" (holiday)");
        } else {
            label.push_str(&format!(" ({} slots)", day.people.len()));
        }
        xml.push_str(&inline_cell(col, 1, &label));
    }
    xml.push_str("</row>\n");

    for row in 0..body_rows {
        xml.push_str(&format!("    <row r=\"{}\">", row + 2));
        for (col, day) in schedule.days.iter().enumerate() {
            if let Some(person) = day.people.get(row) {
                xml.push_str(&inline_cell(col, row + 2, person));
            }
        }
        xml.push_str("</row>\n");
    }

    xml.push_str("  </sheetData>\n</worksheet>");
    xml
}

fn inline_cell(col: usize, row: usize, text: &str) -> String {
    format!(
        "<c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        column_name(col),
        row,
        escape(text)
    )
}

/// Spreadsheet column name for a zero-based index (A, B, ... Z, AA, ...).
fn column_name(index: usize) -> String {
    let mut remainder = index;
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (remainder % 26) as u8) as char);
        if remainder < 26 {
            break;
        }
        remainder = remainder / 26 - 1;
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DayAssignment;
    use chrono::NaiveDate;
    use std::io::Read;

    fn sample_schedule() -> Schedule {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        Schedule {
            days: vec![
                DayAssignment {
                    label: "Monday".to_string(),
                    date: monday,
                    holiday: false,
                    people: vec!["Sara".to_string(), "Hamza".to_string()],
                },
                DayAssignment {
                    label: "Tuesday".to_string(),
                    date: monday + chrono::Duration::days(1),
                    holiday: true,
                    people: vec![],
                },
                DayAssignment {
                    label: "Wednesday".to_string(),
                    date: monday + chrono::Duration::days(2),
                    holiday: false,
                    people: vec!["O & M <well>".to_string()],
                },
            ],
        }
    }

    fn read_entry(data: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data.to_vec())).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_workbook_has_expected_parts() {
        let data = render_workbook(&sample_schedule()).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
    }

    #[test]
    fn test_sheet_contains_assignments_and_annotations() {
        let data = render_workbook(&sample_schedule()).unwrap();
        let sheet = read_entry(&data, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("Monday 2026-08-31 (2 slots)"));
        assert!(sheet.contains("Tuesday 2026-09-01 (holiday)"));
        assert!(sheet.contains("Sara"));
        // Escaped, not raw markup.
        assert!(sheet.contains("O &amp; M &lt;well&gt;"));
        assert!(!sheet.contains("<well>"));
    }

    #[test]
    fn test_workbook_references_sheet_name() {
        let data = render_workbook(&sample_schedule()).unwrap();
        let workbook = read_entry(&data, "xl/workbook.xml");
        assert!(workbook.contains(SHEET_NAME));
    }

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(4), "E");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
    }

    #[test]
    fn test_empty_schedule_still_renders() {
        let schedule = Schedule { days: vec![] };
        let data = render_workbook(&schedule).unwrap();
        let sheet = read_entry(&data, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<sheetData>"));
    }
}
