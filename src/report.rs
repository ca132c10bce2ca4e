// src/report.rs
//
// Single-page complaint sheet layout. Produces positioned text and boxes in
// PDF points; turning that into bytes is left to whatever renderer the
// client uses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Complaint;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 40.0;
pub const HEADER_HEIGHT: f32 = 100.0;
pub const BASE_ROW_HEIGHT: f32 = 30.0;
pub const LABEL_WIDTH: f32 = 180.0;
pub const VALUE_WIDTH: f32 = 340.0;
pub const CELL_PADDING: f32 = 10.0;
pub const LINE_HEIGHT: f32 = 14.0;
const TABLE_GAP: f32 = 30.0;
const TEXT_BASELINE: f32 = 18.0;
const FOOTER_BASELINE: f32 = 20.0;

pub const INSTITUTION: &str = "Government College of Engineering, Karad";
pub const TITLE: &str = "Complaint Details";
pub const APP_NAME: &str = "GCEK Electrifix App";

/// Text width in points at the value font size.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f32;
}

/// Every glyph has the same advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance(pub f32);

impl Default for FixedAdvance {
    // average advance of a 12pt sans face
    fn default() -> Self {
        FixedAdvance(6.0)
    }
}

impl TextMeasure for FixedAdvance {
    fn width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shade {
    Header,
    Even,
    Odd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub top: f32,
    pub height: f32,
    pub shade: Shade,
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLayout {
    pub file_name: String,
    pub page_width: f32,
    pub page_height: f32,
    /// Centered header lines, top to bottom.
    pub header: Vec<TextLine>,
    pub rows: Vec<TableRow>,
    pub footer: TextLine,
}

/// Word-wraps `text` to `max_width`. Explicit newlines always break; a
/// word wider than the column gets a line of its own.
pub fn wrap<M: TextMeasure + ?Sized>(text: &str, measure: &M, max_width: f32) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure.width(&candidate) <= max_width || current.is_empty() {
                current = candidate;
            } else {
                out.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

fn fields(c: &Complaint) -> Vec<(&'static str, String)> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        ("Complaint ID", c.id.clone()),
        ("Description", text(&c.description)),
        ("Status", text(&c.status)),
        ("Date", c.created_at.map(|d| d.format("%d/%m/%Y %H:%M").to_string()).unwrap_or_default()),
        ("Type", text(&c.complaint_type)),
        ("Department", text(&c.department)),
        ("Contact Person", text(&c.contact_person)),
        ("Email", text(&c.email)),
        ("Phone", text(&c.phone)),
        ("Priority", text(&c.priority)),
        ("Location", text(&c.location)),
        ("Remarks", text(&c.remarks)),
    ]
}

pub fn layout<M: TextMeasure + ?Sized>(
    complaint: &Complaint,
    measure: &M,
    generated_at: DateTime<Utc>,
) -> ReportLayout {
    let center = PAGE_WIDTH / 2.0;
    let mid = HEADER_HEIGHT / 2.0;
    let header = vec![
        TextLine { x: center, y: mid - 10.0, text: INSTITUTION.to_string() },
        TextLine { x: center, y: mid + 15.0, text: TITLE.to_string() },
        TextLine { x: center, y: mid + 35.0, text: APP_NAME.to_string() },
    ];

    let label_x = MARGIN + CELL_PADDING;
    let value_x = MARGIN + LABEL_WIDTH + CELL_PADDING;
    let wrap_width = VALUE_WIDTH - 2.0 * CELL_PADDING;

    let mut top = HEADER_HEIGHT + TABLE_GAP;
    let mut rows = vec![TableRow {
        label: "Field".to_string(),
        top,
        height: BASE_ROW_HEIGHT,
        shade: Shade::Header,
        lines: vec![
            TextLine { x: label_x, y: top + BASE_ROW_HEIGHT - 10.0, text: "Field".to_string() },
            TextLine { x: value_x, y: top + BASE_ROW_HEIGHT - 10.0, text: "Value".to_string() },
        ],
    }];
    top += BASE_ROW_HEIGHT;

    for (i, (label, value)) in fields(complaint).into_iter().enumerate() {
        let wrapped = wrap(&value, measure, wrap_width);
        let extra = wrapped.len().saturating_sub(1) as f32;
        let height = BASE_ROW_HEIGHT + extra * LINE_HEIGHT;

        let mut lines = vec![TextLine { x: label_x, y: top + TEXT_BASELINE, text: label.to_string() }];
        lines.extend(wrapped.into_iter().enumerate().map(|(n, text)| TextLine {
            x: value_x,
            y: top + TEXT_BASELINE + n as f32 * LINE_HEIGHT,
            text,
        }));

        rows.push(TableRow {
            label: label.to_string(),
            top,
            height,
            shade: if i % 2 == 0 { Shade::Even } else { Shade::Odd },
            lines,
        });
        top += height;
    }

    let footer = TextLine {
        x: center,
        y: PAGE_HEIGHT - FOOTER_BASELINE,
        text: format!("Generated on {}", generated_at.format("%d/%m/%Y %H:%M")),
    };

    ReportLayout {
        file_name: format!("Complaint_{}_{}.pdf", complaint.id, generated_at.format("%Y%m%d_%H%M%S")),
        page_width: PAGE_WIDTH,
        page_height: PAGE_HEIGHT,
        header,
        rows,
        footer,
    }
}
