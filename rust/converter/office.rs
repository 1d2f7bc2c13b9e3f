//! Office Open XML documents (docx, pptx). Both formats are zip containers of
//! XML parts; only the text-bearing parts are read.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::debug;
use zip::{ZipArchive, result::ZipError};

use super::table::markdown_table;
use crate::{converter::ConvertedDocument, error::ConversionError};

const DOCX_BODY: &str = "word/document.xml";
const CORE_PROPERTIES: &str = "docProps/core.xml";
const PRESENTATION: &str = "ppt/presentation.xml";
const SLIDE_PREFIX: &str = "ppt/slides/slide";
const NOTES_SLIDE_REL_TYPE: &str = "/notesSlide";

pub(super) fn docx_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let mut archive = open_archive(path)?;
    let body = read_part(&mut archive, DOCX_BODY)?
        .ok_or_else(|| ConversionError::Empty(format!("{} ({DOCX_BODY})", path.display())))?;
    let title = core_title(&mut archive)?;

    let markdown = parse_docx_body(&body)?;
    Ok(ConvertedDocument::new(markdown).with_title(title))
}

pub(super) fn pptx_to_markdown(path: &Path) -> Result<ConvertedDocument, ConversionError> {
    let mut archive = open_archive(path)?;
    let title = core_title(&mut archive)?;

    let slides = slide_parts(&mut archive)?;
    debug!(path = %path.display(), slide_count = slides.len(), "converting presentation");

    let mut sections = Vec::with_capacity(slides.len());
    for part in &slides {
        let Some(xml) = read_part(&mut archive, part)? else {
            continue;
        };
        let shapes = parse_shapes(&xml)?;
        let notes = match notes_part_for_slide(&mut archive, part)? {
            Some(notes_part) => match read_part(&mut archive, &notes_part)? {
                Some(notes_xml) => notes_text(&parse_shapes(&notes_xml)?),
                None => None,
            },
            None => None,
        };
        sections.push(render_slide(sections.len() + 1, &shapes, notes.as_deref()));
    }

    Ok(ConvertedDocument::new(sections.join("\n\n")).with_title(title))
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>, ConversionError> {
    let file = File::open(path).map_err(|e| ConversionError::io(path, e))?;
    Ok(ZipArchive::new(file)?)
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>, ConversionError> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ConversionError::io(name, e))?;
    Ok(Some(xml))
}

fn attr_value(element: &BytesStart<'_>, local: &[u8]) -> Result<Option<String>, ConversionError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == local {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn core_title(archive: &mut ZipArchive<File>) -> Result<Option<String>, ConversionError> {
    let Some(xml) = read_part(archive, CORE_PROPERTIES)? else {
        return Ok(None);
    };

    let mut reader = Reader::from_str(&xml);
    let mut in_title = false;
    let mut title = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"title" => in_title = true,
            Event::End(e) if e.local_name().as_ref() == b"title" => in_title = false,
            Event::Text(t) if in_title => title.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    let title = title.trim();
    Ok((!title.is_empty()).then(|| title.to_string()))
}

fn heading_level(style: &str) -> Option<usize> {
    if style.eq_ignore_ascii_case("title") {
        return Some(1);
    }
    let rest = style.get(..7)?;
    if !rest.eq_ignore_ascii_case("heading") {
        return None;
    }
    style[7..]
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|level| (1..=6).contains(level))
}

#[derive(Default)]
struct DocxParagraph {
    text: String,
    heading: Option<usize>,
    list_item: bool,
}

#[derive(Default)]
struct DocxState {
    blocks: Vec<String>,
    // Text boxes nest whole paragraphs inside a run of the outer one.
    paragraphs: Vec<DocxParagraph>,
    run_depth: usize,
    in_text: bool,
    table_depth: usize,
    table: Vec<Vec<String>>,
    row: Vec<String>,
    cell: Vec<String>,
}

impl DocxState {
    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.text.push_str(text);
        }
    }

    fn finish_paragraph(&mut self) {
        let Some(paragraph) = self.paragraphs.pop() else {
            return;
        };
        let text = paragraph.text.trim();
        if text.is_empty() {
            return;
        }
        if self.table_depth > 0 {
            self.cell.push(text.to_string());
            return;
        }

        let block = match (paragraph.heading, paragraph.list_item) {
            (Some(level), _) => format!("{} {text}", "#".repeat(level)),
            (None, true) => format!("- {text}"),
            (None, false) => text.to_string(),
        };
        self.blocks.push(block);
    }

    fn element(&mut self, element: &BytesStart<'_>, empty: bool) -> Result<(), ConversionError> {
        match element.local_name().as_ref() {
            b"p" if !empty => self.paragraphs.push(DocxParagraph::default()),
            b"pStyle" => {
                if let Some(style) = attr_value(element, b"val")? {
                    if let Some(paragraph) = self.paragraphs.last_mut() {
                        paragraph.heading = heading_level(&style);
                    }
                }
            }
            b"numPr" => {
                if let Some(paragraph) = self.paragraphs.last_mut() {
                    paragraph.list_item = true;
                }
            }
            b"r" if !empty => self.run_depth += 1,
            b"t" if !empty => self.in_text = self.run_depth > 0,
            b"tab" if self.run_depth > 0 => self.push_text("\t"),
            b"br" | b"cr" if self.run_depth > 0 => self.push_text("\n"),
            b"tbl" if !empty => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table.clear();
                }
            }
            b"tr" if self.table_depth == 1 => self.row.clear(),
            b"tc" if self.table_depth == 1 => self.cell.clear(),
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local: &[u8]) {
        match local {
            b"p" => self.finish_paragraph(),
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"t" => self.in_text = false,
            b"tc" if self.table_depth == 1 => {
                let cell = std::mem::take(&mut self.cell).join(" ");
                self.row.push(cell);
            }
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.table.push(row);
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    let table = std::mem::take(&mut self.table);
                    let rendered = markdown_table(&table);
                    if !rendered.is_empty() {
                        self.blocks.push(rendered.trim_end().to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

/// Walks the document body. `mc:Fallback` branches repeat the content of
/// their `mc:Choice` sibling and are skipped.
fn parse_docx_body(xml: &str) -> Result<String, ConversionError> {
    let mut reader = Reader::from_str(xml);
    let mut state = DocxState::default();
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
            Event::End(e) if e.local_name().as_ref() == b"Fallback" => {
                fallback_depth = fallback_depth.saturating_sub(1);
            }
            _ if fallback_depth > 0 => {}
            Event::Start(e) => state.element(&e, false)?,
            Event::Empty(e) => state.element(&e, true)?,
            Event::End(e) => state.end(e.local_name().as_ref()),
            Event::Text(t) if state.in_text => state.push_text(&t.unescape()?),
            _ => {}
        }
    }

    Ok(state.blocks.join("\n\n"))
}

#[derive(Debug, Default)]
struct Shape {
    placeholder: Option<String>,
    paragraphs: Vec<String>,
    table: Vec<Vec<String>>,
}

impl Shape {
    fn is_title(&self) -> bool {
        matches!(self.placeholder.as_deref(), Some("title" | "ctrTitle"))
    }
}

/// Collects text frames and tables from a slide or notes part, in document
/// order.
fn parse_shapes(xml: &str) -> Result<Vec<Shape>, ConversionError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut current: Option<Shape> = None;
    let mut paragraph = String::new();
    let mut in_text = false;
    let mut in_cell = false;
    let mut row: Vec<String> = Vec::new();
    let mut cell: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" | b"graphicFrame" => current = Some(Shape::default()),
                b"ph" => set_placeholder(current.as_mut(), &e)?,
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                b"tr" => row.clear(),
                b"tc" => {
                    cell.clear();
                    in_cell = true;
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"ph" => set_placeholder(current.as_mut(), &e)?,
                b"br" => paragraph.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"sp" | b"graphicFrame" => {
                    if let Some(shape) = current.take() {
                        shapes.push(shape);
                    }
                }
                b"t" => in_text = false,
                b"p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        if in_cell {
                            cell.push(text.to_string());
                        } else if let Some(shape) = current.as_mut() {
                            shape.paragraphs.push(text.to_string());
                        }
                    }
                }
                b"tc" => {
                    row.push(std::mem::take(&mut cell).join(" "));
                    in_cell = false;
                }
                b"tr" => {
                    if let Some(shape) = current.as_mut() {
                        shape.table.push(std::mem::take(&mut row));
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => paragraph.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

fn set_placeholder(shape: Option<&mut Shape>, element: &BytesStart<'_>) -> Result<(), ConversionError> {
    if let Some(shape) = shape {
        shape.placeholder = Some(attr_value(element, b"type")?.unwrap_or_else(|| "body".to_string()));
    }
    Ok(())
}

fn render_slide(number: usize, shapes: &[Shape], notes: Option<&str>) -> String {
    let mut blocks = vec![format!("<!-- Slide number: {number} -->")];

    for shape in shapes {
        if !shape.table.is_empty() {
            blocks.push(markdown_table(&shape.table).trim_end().to_string());
        }
        if shape.paragraphs.is_empty() {
            continue;
        }
        let text = shape.paragraphs.join("\n");
        if shape.is_title() {
            blocks.push(format!("# {}", text.replace('\n', " ")));
        } else {
            blocks.push(text);
        }
    }

    if let Some(notes) = notes {
        blocks.push(format!("### Notes:\n{notes}"));
    }

    blocks.join("\n\n")
}

fn notes_text(shapes: &[Shape]) -> Option<String> {
    let text = shapes
        .iter()
        .filter(|shape| shape.placeholder.as_deref() == Some("body"))
        .flat_map(|shape| shape.paragraphs.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");
    (!text.is_empty()).then_some(text)
}

fn slide_number(part: &str) -> Option<usize> {
    part.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Slide parts in presentation order: the `sldIdLst` of `ppt/presentation.xml`
/// mapped through its relationships. Packages without a usable slide list fall
/// back to the numeric order of `slideN.xml`.
fn slide_parts(archive: &mut ZipArchive<File>) -> Result<Vec<String>, ConversionError> {
    let mut ordered = Vec::new();
    if let Some(xml) = read_part(archive, PRESENTATION)? {
        let targets = relationships(archive, PRESENTATION)?;
        let mut reader = Reader::from_str(&xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                    let Some(id) = relationship_id(&e)? else {
                        continue;
                    };
                    if let Some(rel) = targets.iter().find(|rel| rel.id == id) {
                        ordered.push(rel.target.clone());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
    }
    if !ordered.is_empty() {
        return Ok(ordered);
    }

    let mut numbered: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|number| (number, name.to_string())))
        .collect();
    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, part)| part).collect())
}

/// The namespaced `r:id` of a `sldId`, as opposed to its numeric `id`.
fn relationship_id(element: &BytesStart<'_>) -> Result<Option<String>, ConversionError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[derive(Debug)]
struct Relationship {
    id: String,
    kind: String,
    target: String,
}

/// Reads the `_rels` part of `source_part`, resolving internal targets to
/// archive paths.
fn relationships(
    archive: &mut ZipArchive<File>,
    source_part: &str,
) -> Result<Vec<Relationship>, ConversionError> {
    let (dir, rels_part) = match source_part.rsplit_once('/') {
        Some((dir, file)) => (dir, format!("{dir}/_rels/{file}.rels")),
        None => ("", format!("_rels/{source_part}.rels")),
    };
    let Some(xml) = read_part(archive, &rels_part)? else {
        return Ok(Vec::new());
    };

    let mut rels = Vec::new();
    let mut reader = Reader::from_str(&xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attr_value(&e, b"TargetMode")?.as_deref() == Some("External") {
                    continue;
                }
                let (Some(id), Some(target)) = (attr_value(&e, b"Id")?, attr_value(&e, b"Target")?) else {
                    continue;
                };
                rels.push(Relationship {
                    id,
                    kind: attr_value(&e, b"Type")?.unwrap_or_default(),
                    target: resolve_target(dir, &target),
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

fn notes_part_for_slide(
    archive: &mut ZipArchive<File>,
    slide_part: &str,
) -> Result<Option<String>, ConversionError> {
    Ok(relationships(archive, slide_part)?
        .into_iter()
        .find(|rel| rel.kind.ends_with(NOTES_SLIDE_REL_TYPE))
        .map(|rel| rel.target))
}

/// Resolves a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut resolved = PathBuf::new();
    for segment in base_dir.split('/').chain(target.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
        .iter()
        .map(|segment| segment.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
