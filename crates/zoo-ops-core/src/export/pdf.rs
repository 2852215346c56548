//! Minimal PDF writer for text reports.
//!
//! Layout follows a fixed A4 template: a title and a generated-on line at
//! the top of the first page, then body text wrapped to the printable
//! width. Text uses the built-in Helvetica font, so only Latin-1 characters
//! are drawn; anything else is substituted.

use std::fmt::Write as _;

const MM_TO_PT: f64 = 72.0 / 25.4;

/// Page geometry and typography, in millimetres and points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub line_height: f64,
    /// Body font size in points
    pub font_size: f64,
    pub title: String,
    pub title_size: f64,
    pub subtitle_size: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            line_height: 7.0,
            font_size: 11.0,
            title: "Jungle Safari Zoo Report".to_string(),
            title_size: 16.0,
            subtitle_size: 10.0,
        }
    }
}

impl PageLayout {
    pub fn printable_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Baseline of the first body line on page one, below the header.
    fn first_body_y(&self) -> f64 {
        self.margin + 20.0
    }

    fn fits(&self, y: f64) -> bool {
        y + self.line_height <= self.page_height - self.margin
    }
}

/// One laid-out page of body text; `y` is the baseline from the top edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<(f64, String)>,
}

/// Approximate Helvetica advance width in 1/1000 em.
fn glyph_width(c: char) -> u32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' => 222,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'f' | 't' | 'I' | '/' | '[' | ']' | '(' | ')' | '-' => 278,
        'r' => 333,
        '"' | '*' => 389,
        'm' | 'M' => 833,
        'w' => 722,
        'W' => 944,
        'A'..='Z' => 667,
        '0'..='9' | 'a'..='z' => 556,
        '=' | '+' | '<' | '>' => 584,
        _ => 556,
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(glyph_width).sum();
    f64::from(units) / 1000.0 * font_size / MM_TO_PT
}

/// Break text into lines no wider than `max_width` mm.
///
/// Explicit newlines are kept, including blank lines. Words wider than a
/// whole line are split by character.
pub fn wrap_text(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, font_size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            for ch in word.chars() {
                line.push(ch);
                if text_width(&line, font_size) > max_width && line.chars().count() > 1 {
                    line.pop();
                    out.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }
        out.push(line);
    }
    out
}

/// Wrap `content` and distribute the lines over pages.
///
/// A new page starts once the next line would cross the bottom margin;
/// continuation pages start at the top margin.
pub fn paginate(content: &str, layout: &PageLayout) -> Vec<Page> {
    let mut pages = vec![Page::default()];
    let mut y = layout.first_body_y();
    for line in wrap_text(content, layout.printable_width(), layout.font_size) {
        if !layout.fits(y) {
            pages.push(Page::default());
            y = layout.margin;
        }
        if let Some(page) = pages.last_mut() {
            page.lines.push((y, line));
        }
        y += layout.line_height;
    }
    pages
}

/// Encode text as a PDF literal string body (WinAnsi bytes, escaped).
fn pdf_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            '₹' => out.extend_from_slice(b"Rs."),
            '\t' => out.push(b' '),
            c if (c as u32) >= 0x20 && (c as u32) < 0x7F => out.push(c as u8),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

fn text_op(stream: &mut Vec<u8>, size: f64, x_pt: f64, y_pt: f64, text: &str) {
    stream.extend_from_slice(format!("BT /F1 {} Tf {:.2} {:.2} Td (", size, x_pt, y_pt).as_bytes());
    stream.extend_from_slice(&pdf_string(text));
    stream.extend_from_slice(b") Tj ET\n");
}

/// Render a report to PDF 1.4 bytes.
///
/// `generated` is printed below the title as `Generated: {generated}`.
pub fn render_pdf(content: &str, generated: &str, layout: &PageLayout) -> Vec<u8> {
    let pages = paginate(content, layout);
    let width_pt = layout.page_width * MM_TO_PT;
    let height_pt = layout.page_height * MM_TO_PT;
    let x = layout.margin * MM_TO_PT;
    let to_pdf_y = |y_mm: f64| height_pt - y_mm * MM_TO_PT;

    // 1 catalog, 2 page tree, 3 font, then (page, contents) per page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(3 + 2 * pages.len());
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).into_bytes());
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
    );

    for (index, page) in pages.iter().enumerate() {
        let mut stream = Vec::new();
        if index == 0 {
            text_op(&mut stream, layout.title_size, x, to_pdf_y(layout.margin), &layout.title);
            text_op(
                &mut stream,
                layout.subtitle_size,
                x,
                to_pdf_y(layout.margin + 10.0),
                &format!("Generated: {}", generated),
            );
        }
        for (y, line) in &page.lines {
            if !line.is_empty() {
                text_op(&mut stream, layout.font_size, x, to_pdf_y(*y), line);
            }
        }

        let mut page_obj = String::new();
        let _ = write!(
            page_obj,
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            width_pt,
            height_pt,
            page_ids[index] + 1
        );
        objects.push(page_obj.into_bytes());

        let mut contents = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        contents.extend_from_slice(&stream);
        contents.extend_from_slice(b"endstream");
        objects.push(contents);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{:010} 00000 n ", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.extend_from_slice(xref.as_bytes());
    out
}
