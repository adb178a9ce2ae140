//! YOLO TXT label format.
//!
//! One box per line: `<class> <x_center> <y_center> <width> <height>`, all
//! geometry normalized to `[0, 1]`. Parsing is lenient: lines that do not
//! look like a box are skipped without an error.

use crate::model::Label;

/// Number of fields in a box line.
const FIELDS: usize = 5;

/// Result of parsing a label file, including which lines were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// Labels in file order.
    pub labels: Vec<Label>,
    /// 1-based line numbers of non-blank lines that were not valid boxes.
    pub skipped_lines: Vec<usize>,
}

impl ParseReport {
    pub fn has_skipped(&self) -> bool {
        !self.skipped_lines.is_empty()
    }
}

/// Parse label text into labels, dropping malformed lines.
pub fn parse(text: &str) -> Vec<Label> {
    parse_report(text).labels
}

/// Parse label text and record the malformed lines.
pub fn parse_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(label) => report.labels.push(label),
            None => {
                log::debug!("Skipping malformed label line {}: {:?}", idx + 1, line);
                report.skipped_lines.push(idx + 1);
            }
        }
    }

    report
}

/// Parse a single box line.
fn parse_line(line: &str) -> Option<Label> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < FIELDS {
        return None;
    }

    // Class ids may be written as "2" or "2.0"
    let class: f64 = parts[0].parse().ok()?;
    if !class.is_finite() || class < 0.0 || class.trunc() > f64::from(u32::MAX) {
        return None;
    }

    let x: f32 = finite(parts[1])?;
    let y: f32 = finite(parts[2])?;
    let w: f32 = finite(parts[3])?;
    let h: f32 = finite(parts[4])?;

    Some(Label::new(class.trunc() as u32, x, y, w, h))
}

fn finite(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Serialize labels into label text.
///
/// Geometry uses exactly six decimals; lines are joined by `\n` with no
/// trailing newline. Prediction flags are not part of the format.
pub fn serialize(labels: &[Label]) -> String {
    labels
        .iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(label: &Label) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        label.class_id, label.x, label.y, label.w, label.h
    )
}
