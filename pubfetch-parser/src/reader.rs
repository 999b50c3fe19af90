//! Streaming entry point: finds article containers in a document and yields records lazily

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument, warn};

use crate::assembler::assemble_record;
use crate::common::tree::{Element, Node};
use crate::common::xml_utils::decode_entities;
use crate::error::{ParseError, Result};
use crate::record::ArticleRecord;
use crate::schema::{SchemaDescriptor, SchemaVariant};

/// Where the XML payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlSource {
    /// Raw XML already in memory
    Text(String),
    /// Path to an XML file on disk
    Path(PathBuf),
}

impl XmlSource {
    /// Treat `input` as a path when it names an existing file, otherwise as raw XML
    pub fn detect(input: impl Into<String>) -> Self {
        let input = input.into();
        if !input.trim_start().starts_with('<') && Path::new(&input).is_file() {
            XmlSource::Path(PathBuf::from(input))
        } else {
            XmlSource::Text(input)
        }
    }
}

impl From<String> for XmlSource {
    fn from(text: String) -> Self {
        XmlSource::Text(text)
    }
}

impl From<&str> for XmlSource {
    fn from(text: &str) -> Self {
        XmlSource::Text(text.to_string())
    }
}

impl From<PathBuf> for XmlSource {
    fn from(path: PathBuf) -> Self {
        XmlSource::Path(path)
    }
}

/// Create a configured `Reader` over any buffered source.
///
/// `expand_empty_elements` turns `<tag/>` into `Start` + `End` so tree building only
/// has to deal with one shape. Text is not trimmed; whitespace is collapsed later per
/// field.
fn make_reader<R: BufRead>(source: R) -> Reader<R> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().expand_empty_elements = true;
    reader
}

/// Parse records from a source, lazily
///
/// Only opening the source can fail here; per-article errors surface while iterating.
#[instrument(skip(source))]
pub fn parse_records(source: impl Into<XmlSource>, variant: SchemaVariant) -> Result<Records> {
    let input: Box<dyn BufRead + Send> = match source.into() {
        XmlSource::Text(text) => {
            debug!(xml_size = text.len(), "Parsing records from memory");
            Box::new(Cursor::new(text.into_bytes()))
        }
        XmlSource::Path(path) => {
            let file = File::open(&path).map_err(|e| ParseError::IoError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            debug!(path = %path.display(), "Parsing records from file");
            Box::new(BufReader::new(file))
        }
    };

    Ok(Records {
        reader: make_reader(input),
        descriptor: variant.descriptor(),
        buf: Vec::new(),
        finished: false,
        yielded: 0,
    })
}

/// Lazy, finite, non-restartable sequence of article records
///
/// Each call to `next` reads just far enough to materialize one article container.
/// A malformed document produces one `Err` and then ends the sequence; a missing
/// required element only fails that article.
pub struct Records {
    reader: Reader<Box<dyn BufRead + Send>>,
    descriptor: &'static SchemaDescriptor,
    buf: Vec<u8>,
    finished: bool,
    yielded: usize,
}

enum Step {
    Open(Element),
    Leaf(Element),
    Close,
    Text(String),
    Eof,
    Skip,
}

impl Records {
    pub fn variant(&self) -> SchemaVariant {
        self.descriptor.variant
    }

    fn read_step(&mut self) -> Result<Step> {
        let step = {
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(ParseError::xml)?;
            match event {
                Event::Start(ref e) => Step::Open(element_from_start(e)),
                Event::Empty(ref e) => Step::Leaf(element_from_start(e)),
                Event::End(_) => Step::Close,
                Event::Text(ref t) => {
                    Step::Text(decode_entities(&String::from_utf8_lossy(t)).into_owned())
                }
                Event::CData(ref c) => Step::Text(String::from_utf8_lossy(c).into_owned()),
                Event::Eof => Step::Eof,
                _ => Step::Skip,
            }
        };
        self.buf.clear();
        Ok(step)
    }

    /// Advance to the next container start tag and materialize its subtree
    fn next_container(&mut self) -> Result<Option<Element>> {
        loop {
            match self.read_step()? {
                Step::Open(element) if element.name == self.descriptor.container => {
                    return self.read_subtree(element).map(Some);
                }
                Step::Leaf(element) if element.name == self.descriptor.container => {
                    return Ok(Some(element));
                }
                Step::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    fn read_subtree(&mut self, root: Element) -> Result<Element> {
        let container = root.name.clone();
        let mut stack = vec![root];

        loop {
            match self.read_step()? {
                Step::Open(element) => stack.push(element),
                Step::Leaf(element) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Element(element));
                    }
                }
                Step::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text));
                    }
                }
                Step::Close => {
                    let Some(finished) = stack.pop() else {
                        return Err(ParseError::XmlError(format!(
                            "unbalanced end tag inside <{container}>"
                        )));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(finished)),
                        None => return Ok(finished),
                    }
                }
                Step::Eof => {
                    return Err(ParseError::XmlError(format!(
                        "unexpected end of document inside <{container}>"
                    )));
                }
                Step::Skip => {}
            }
        }
    }
}

impl Iterator for Records {
    type Item = Result<ArticleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_container() {
            Ok(Some(article)) => {
                self.yielded += 1;
                Some(assemble_record(&article, self.descriptor))
            }
            Ok(None) => {
                debug!(records = self.yielded, "Reached end of document");
                self.finished = true;
                None
            }
            Err(e) => {
                warn!(error = %e, records = self.yielded, "Stopping at malformed XML");
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Records {}

fn element_from_start(start: &BytesStart) -> Element {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = decode_entities(&String::from_utf8_lossy(&attr.value)).into_owned();
        element.attributes.push((key, value));
    }
    element
}
