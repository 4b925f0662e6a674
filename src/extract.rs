//! Plain-text extraction from document files.
//!
//! | Extension | Source                                                  |
//! |-----------|---------------------------------------------------------|
//! | `txt`     | UTF-8, invalid sequences replaced                       |
//! | `pdf`     | page text in order, via `pdf-extract`                   |
//! | `docx`    | `word/document.xml`, one line per paragraph             |
//! | `pptx`    | `ppt/slides/slideN.xml` in slide order, one line per    |
//! |           | paragraph of every text-bearing shape                   |
//!
//! Extensions match case-insensitively. Anything else is
//! [`Error::UnsupportedFormat`].

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::{Document, Error, Result};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain text.
    Txt,
    /// Portable Document Format.
    Pdf,
    /// Word document.
    Docx,
    /// PowerPoint presentation.
    Pptx,
}

impl Format {
    /// Detect the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "txt" => Ok(Self::Txt),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "pptx" => Ok(Self::Pptx),
            _ => Err(Error::UnsupportedFormat(extension)),
        }
    }
}

/// Extract a document's plain text.
///
/// # Errors
///
/// - [`Error::NotFound`] if `path` does not exist
/// - [`Error::UnsupportedFormat`] for unknown extensions
/// - [`Error::Read`] / [`Error::Corrupt`] if the file cannot be read or parsed
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let format = Format::from_path(path)?;

    let text = match format {
        Format::Txt => String::from_utf8_lossy(&read(path)?).into_owned(),
        Format::Pdf => pdf_extract::extract_text_from_mem(&read(path)?)
            .map_err(|e| corrupt(path, e))?,
        Format::Docx => {
            let mut archive = open_archive(path)?;
            let xml = read_entry(&mut archive, path, "word/document.xml")?;
            word_paragraphs(&xml).map_err(|e| corrupt(path, e))?.join("\n")
        }
        Format::Pptx => {
            let mut archive = open_archive(path)?;
            let mut shapes = Vec::new();
            for name in slide_names(&archive) {
                let xml = read_entry(&mut archive, path, &name)?;
                shapes.extend(slide_shapes(&xml).map_err(|e| corrupt(path, e))?);
            }
            shapes.join("\n")
        }
    };

    tracing::debug!(path = %path.display(), ?format, chars = text.len(), "extracted text");
    Ok(text)
}

/// Extract a file into a [`Document`].
///
/// # Errors
///
/// As [`extract_text`], plus [`Error::EmptyInput`] if the file has no words.
///
/// ```rust,no_run
/// let doc = condense::extract("report.docx")?;
/// println!("~{} words", doc.word_count());
/// # Ok::<(), condense::Error>(())
/// ```
pub fn extract(path: impl AsRef<Path>) -> Result<Document> {
    Document::new(extract_text(path)?)
}

fn corrupt(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Corrupt {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|e| corrupt(path, e))
}

fn read_entry(archive: &mut ZipArchive<File>, path: &Path, name: &str) -> Result<String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| corrupt(path, format!("{name}: {e}")))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| corrupt(path, format!("{name}: {e}")))?;
    Ok(xml)
}

/// Slide entries sorted by slide number, not lexically.
fn slide_names(archive: &ZipArchive<File>) -> Vec<String> {
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_unstable();
    slides.into_iter().map(|(_, name)| name).collect()
}

/// Element names for one XML text vocabulary.
struct Markup {
    paragraph: &'static [u8],
    text: &'static [u8],
    line_break: &'static [u8],
    tab: &'static [u8],
}

const WORDPROCESSING: Markup = Markup {
    paragraph: b"w:p",
    text: b"w:t",
    line_break: b"w:br",
    tab: b"w:tab",
};

const DRAWING: Markup = Markup {
    paragraph: b"a:p",
    text: b"a:t",
    line_break: b"a:br",
    tab: b"a:tab",
};

/// Paragraph text accumulated while walking XML events.
#[derive(Default)]
struct Paragraphs {
    done: Vec<String>,
    open: Option<String>,
    in_text: bool,
}

impl Paragraphs {
    /// Handle an element start, or an empty element.
    fn start(&mut self, name: &[u8], markup: &Markup, empty: bool) {
        if name == markup.paragraph {
            self.close();
            self.open = Some(String::new());
            if empty {
                self.close();
            }
        } else if name == markup.text {
            self.in_text = !empty;
        } else if name == markup.line_break {
            self.push('\n');
        } else if name == markup.tab {
            self.push('\t');
        }
    }

    fn end(&mut self, name: &[u8], markup: &Markup) {
        if name == markup.text {
            self.in_text = false;
        } else if name == markup.paragraph {
            self.close();
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            if let Some(open) = self.open.as_mut() {
                open.push_str(text);
            }
        }
    }

    fn push(&mut self, c: char) {
        if let Some(open) = self.open.as_mut() {
            open.push(c);
        }
    }

    fn close(&mut self) {
        self.in_text = false;
        if let Some(done) = self.open.take() {
            self.done.push(done);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.close();
        self.done
    }
}

/// Paragraphs of a `word/document.xml` body.
fn word_paragraphs(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Paragraphs::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => paragraphs.start(e.name().as_ref(), &WORDPROCESSING, false),
            Event::Empty(e) => paragraphs.start(e.name().as_ref(), &WORDPROCESSING, true),
            Event::End(e) => paragraphs.end(e.name().as_ref(), &WORDPROCESSING),
            Event::Text(e) => paragraphs.text(&e.unescape()?),
            Event::CData(e) => paragraphs.text(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs.finish())
}

/// Text of each shape on a slide that has a text body, its paragraphs
/// joined by newlines. Shapes without a text body (pictures, connectors)
/// are skipped; a text body with no text contributes an empty string.
fn slide_shapes(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut current: Option<(bool, Paragraphs)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:sp" => current = Some((false, Paragraphs::default())),
                b"p:txBody" => {
                    if let Some((has_body, _)) = current.as_mut() {
                        *has_body = true;
                    }
                }
                name => {
                    if let Some((_, paragraphs)) = current.as_mut() {
                        paragraphs.start(name, &DRAWING, false);
                    }
                }
            },
            Event::Empty(e) => {
                if let Some((_, paragraphs)) = current.as_mut() {
                    paragraphs.start(e.name().as_ref(), &DRAWING, true);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"p:sp" => {
                    if let Some((true, paragraphs)) = current.take() {
                        shapes.push(paragraphs.finish().join("\n"));
                    }
                }
                name => {
                    if let Some((_, paragraphs)) = current.as_mut() {
                        paragraphs.end(name, &DRAWING);
                    }
                }
            },
            Event::Text(e) => {
                if let Some((_, paragraphs)) = current.as_mut() {
                    paragraphs.text(&e.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(shapes)
}
