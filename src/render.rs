//! Plain-text PDF output.
//!
//! Layout: A4 portrait, Helvetica 12pt, text wrapped at 100 columns. Lines
//! start 800pt from the bottom edge at x = 50pt and advance 15pt; a new page
//! begins once the baseline would drop below 50pt.
//!
//! Only the base-14 Helvetica font is referenced, so nothing is embedded and
//! text is limited to the WinAnsi character set. Characters outside it are
//! written as `?`; other scripts need an embedded TrueType font, which is
//! not bundled.

use std::borrow::Cow;
use std::path::Path;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use textwrap::{Options, WrapAlgorithm};

use crate::{Error, Result};

/// Wrap width in columns.
pub const WRAP_WIDTH: usize = 100;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const FONT_SIZE: f32 = 12.0;
const LEFT: f32 = 50.0;
const TOP: f32 = 800.0;
const BOTTOM: f32 = 50.0;
const LEADING: f32 = 15.0;

/// Lines that fit on one page.
pub const LINES_PER_PAGE: usize = ((TOP - BOTTOM) / LEADING) as usize + 1;

/// First-fit word wrap.
///
/// Each input line is wrapped on its own, so line breaks in `text` survive.
/// Runs of whitespace collapse to one space. A word longer than `width` is
/// split across lines. Blank input lines are dropped. Width is measured in
/// display columns.
///
/// ```rust
/// use condense::wrap;
///
/// assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
/// assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
/// ```
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let options = Options::new(width.max(1)).wrap_algorithm(WrapAlgorithm::FirstFit);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let normalized = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            continue;
        }
        lines.extend(
            textwrap::wrap(&normalized, &options)
                .into_iter()
                .map(Cow::into_owned),
        );
    }
    lines
}

/// A laid-out text document, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pages: Vec<Vec<String>>,
}

impl PdfDocument {
    /// Wrap and paginate `text`. Empty text yields a single blank page.
    #[must_use]
    pub fn layout(text: &str) -> Self {
        let lines = wrap(text, WRAP_WIDTH);
        let mut pages: Vec<Vec<String>> = lines
            .chunks(LINES_PER_PAGE)
            .map(<[String]>::to_vec)
            .collect();
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        Self { pages }
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Lines on each page.
    #[must_use]
    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    /// Serialize to PDF.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let font = Name(b"F1");
        // Then one (page, content) pair per page
        let page_ids: Vec<(Ref, Ref)> = (0..self.pages.len() as i32)
            .map(|i| (Ref::new(4 + 2 * i), Ref::new(5 + 2 * i)))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|&(page, _)| page))
            .count(page_ids.len() as i32);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        for (lines, &(page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
            page.parent(tree_id);
            page.contents(content_id);
            page.resources().fonts().pair(font, font_id);
            page.finish();

            let mut content = Content::new();
            for (i, line) in lines.iter().enumerate() {
                content
                    .begin_text()
                    .set_font(font, FONT_SIZE)
                    .next_line(LEFT, TOP - LEADING * i as f32)
                    .show(Str(&win_ansi_bytes(line)))
                    .end_text();
            }
            pdf.stream(content_id, &content.finish());
        }

        pdf.finish()
    }
}

/// Encode `text` in WinAnsi. Characters outside it become `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            c => win_ansi(c).unwrap_or(b'?'),
        })
        .collect()
}

fn win_ansi(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20ac}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\u{a0}'..='\u{ff}' => c as u8,
        _ => return None,
    };
    Some(byte)
}

/// Write `text` to `path` as a PDF, returning the page count.
///
/// # Errors
///
/// Returns [`Error::Render`] if the file cannot be written.
pub fn render_pdf(text: &str, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let document = PdfDocument::layout(text);
    std::fs::write(path, document.to_bytes()).map_err(|source| Error::Render {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), pages = document.page_count(), "wrote pdf");
    Ok(document.page_count())
}
