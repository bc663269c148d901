use std::io::Write;

use bookscan_core::ScanReport;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn print_field(
    w: &mut dyn Write,
    label: &str,
    value: Option<&str>,
    color: ColorMode,
) -> std::io::Result<()> {
    match (value, color.enabled()) {
        (Some(v), true) => writeln!(w, "  {:<9} {}", label, v.green()),
        (Some(v), false) => writeln!(w, "  {:<9} {}", label, v),
        (None, true) => writeln!(w, "  {:<9} {}", label, "not found".dimmed()),
        (None, false) => writeln!(w, "  {:<9} not found", label),
    }
}

/// Print the result of scanning one OCR document.
pub fn print_scan_report(
    w: &mut dyn Write,
    file_name: &str,
    report: &ScanReport,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(
        w,
        "Scanned {} ({} lines)",
        file_name,
        report.text.lines().len()
    )?;
    writeln!(w)?;

    let isbn = report
        .isbn
        .as_ref()
        .map(|c| format!("{} (via {})", c.as_str(), c.tier().name()));
    print_field(w, "ISBN:", isbn.as_deref(), color)?;
    print_field(w, "Edition:", report.edition.as_deref(), color)?;

    writeln!(w)?;
    if !report.flaws.any_detected() {
        if color.enabled() {
            writeln!(w, "{}", "No condition flaws detected".green())?;
        } else {
            writeln!(w, "No condition flaws detected")?;
        }
        return Ok(());
    }

    if color.enabled() {
        writeln!(
            w,
            "{}",
            format!("Condition flaws ({}):", report.flaws.len())
                .yellow()
                .bold()
        )?;
    } else {
        writeln!(w, "Condition flaws ({}):", report.flaws.len())?;
    }
    for (key, description) in report.flaws.descriptions() {
        if color.enabled() {
            writeln!(w, "  {} {}", key.yellow(), description.dimmed())?;
        } else {
            writeln!(w, "  {} {}", key, description)?;
        }
    }
    Ok(())
}

/// Print a synthesized title with its length against the budget.
pub fn print_title(
    w: &mut dyn Write,
    title: &str,
    budget: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let chars = title.chars().count();
    if color.enabled() {
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", format!("({}/{} characters)", chars, budget).dimmed())?;
    } else {
        writeln!(w, "{}", title)?;
        writeln!(w, "({}/{} characters)", chars, budget)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookscan_core::{OcrDocument, Scanner};

    fn render(report: &ScanReport) -> String {
        let mut buf = Vec::new();
        print_scan_report(&mut buf, "cover.json", report, ColorMode(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_report_lists_fields_and_flaws() {
        let doc = OcrDocument::from_plain_text("ISBN: 978-0-947163-61-7\nTHIRD EDITION\nWARPED");
        let out = render(&Scanner::new().scan(&doc));
        assert!(out.contains("Scanned cover.json (3 lines)"));
        assert!(out.contains("9780947163617 (via label_line)"));
        assert!(out.contains("Third Edition"));
        assert!(out.contains("WARPED Book is warped"));
    }

    #[test]
    fn plain_report_without_findings() {
        let out = render(&Scanner::new().scan(&OcrDocument::default()));
        assert!(out.contains("not found"));
        assert!(out.contains("No condition flaws detected"));
    }

    #[test]
    fn title_shows_length() {
        let mut buf = Vec::new();
        print_title(&mut buf, "Dune by Frank Herbert PB", 80, ColorMode(false)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "Dune by Frank Herbert PB\n(24/80 characters)\n");
    }
}
