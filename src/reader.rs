use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::element::ElementNode;
use crate::errors::{Error, Result};

/// Pull cursor over an OSM XML stream that hands out one complete element subtree per call.
///
/// Only the subtree being captured is ever materialized; everything between captures is read
/// and thrown away, so memory use does not grow with the size of the file.
pub struct ElementReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl ElementReader<Box<dyn BufRead>> {
    /// Opens `path` for a single forward scan. Files ending in `.xz` are decompressed on the fly.
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|source| Error::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let file_reader = BufReader::new(file);
        let source: Box<dyn BufRead> = if is_xz(path) {
            Box::new(BufReader::new(XzDecoder::new(file_reader)))
        } else {
            Box::new(file_reader)
        };
        Ok(ElementReader::from_reader(source))
    }
}

impl<R: BufRead> ElementReader<R> {
    pub fn from_reader(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);

        ElementReader {
            reader,
            buf: Vec::new(),
        }
    }

    /// Reads forward until an element called `target` has been captured in full.
    ///
    /// Resumes wherever the previous call stopped. Returns `Ok(None)` once the stream is
    /// exhausted without completing a capture.
    pub fn next_element(&mut self, target: &str) -> Result<Option<ElementNode>> {
        let mut open: Vec<ElementNode> = Vec::new();

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(source) => {
                    return Err(Error::StreamMalformed {
                        position: self.reader.buffer_position(),
                        source,
                    })
                }
            };
            let decoder = self.reader.decoder();
            let position = self.reader.buffer_position();

            match event {
                Event::Start(e) => {
                    if open.is_empty() && e.local_name().as_ref() != target.as_bytes() {
                        continue;
                    }
                    let element = build_element(&e, open.len(), decoder)
                        .map_err(|source| Error::StreamMalformed { position, source })?;
                    open.push(element);
                }
                Event::Empty(e) => {
                    if open.is_empty() && e.local_name().as_ref() != target.as_bytes() {
                        continue;
                    }
                    let element = build_element(&e, open.len(), decoder)
                        .map_err(|source| Error::StreamMalformed { position, source })?;
                    match open.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(Some(element)),
                    }
                }
                Event::End(_) => {
                    if let Some(closed) = open.pop() {
                        match open.last_mut() {
                            Some(parent) => parent.children.push(closed),
                            None => return Ok(Some(closed)),
                        }
                    }
                }
                Event::Eof => return Ok(None),
                // Text, comments, CDATA, declarations and PIs carry nothing we need.
                _ => (),
            }
        }
    }
}

fn build_element(start: &BytesStart, depth: usize, decoder: Decoder) -> quick_xml::Result<ElementNode> {
    let name = decoder.decode(start.local_name().as_ref())?.into_owned();

    let mut attributes = Vec::new();
    let mut raw_attributes = start.attributes();
    raw_attributes.with_checks(false);
    for attribute_res in raw_attributes {
        let attribute = attribute_res?;
        let key = decoder.decode(attribute.key.local_name().as_ref())?.into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(ElementNode::new(name, attributes, depth))
}

fn is_xz(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xz"))
        .unwrap_or(false)
}
