//! Streaming reader for gzip-compressed abstract dumps.
//!
//! The dump is a single XML document whose root contains repeated `<doc>`
//! elements, each with `<title>`, `<url>` and `<abstract>` children. The
//! reader decompresses and parses in one pass, so memory stays flat no
//! matter how large the dump is.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One `<doc>` element as it appears in the dump, before an id is assigned.
#[derive(Debug, Default, Clone)]
pub struct RawDoc {
    pub title: String,
    pub url: String,
    pub text: String,
}

#[derive(Clone, Copy)]
enum Field {
    None,
    Title,
    Url,
    Text,
}

pub struct DumpReader {
    reader: Reader<BufReader<GzDecoder<File>>>,
    buf: Vec<u8>,
}

impl DumpReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open dump {}", path.display()))?;
        let mut reader = Reader::from_reader(BufReader::new(GzDecoder::new(file)));
        reader.config_mut().trim_text(true);
        Ok(Self {
            reader,
            buf: Vec::new(),
        })
    }

    /// Pull the next `<doc>` off the stream, or `None` at end of input.
    /// Elements other than the three known children are skipped without
    /// validation.
    pub fn next_doc(&mut self) -> Result<Option<RawDoc>> {
        let mut doc: Option<RawDoc> = None;
        let mut field = Field::None;
        loop {
            self.buf.clear();
            match self
                .reader
                .read_event_into(&mut self.buf)
                .context("malformed XML in dump")?
            {
                Event::Start(e) => match e.name().as_ref() {
                    b"doc" => doc = Some(RawDoc::default()),
                    b"title" => field = Field::Title,
                    b"url" => field = Field::Url,
                    b"abstract" => field = Field::Text,
                    _ => field = Field::None,
                },
                Event::Text(e) => {
                    if let Some(doc) = doc.as_mut() {
                        let value = e.unescape().context("malformed XML text in dump")?;
                        match field {
                            Field::Title => doc.title.push_str(&value),
                            Field::Url => doc.url.push_str(&value),
                            Field::Text => doc.text.push_str(&value),
                            Field::None => {}
                        }
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"doc" {
                        if doc.is_some() {
                            return Ok(doc.take());
                        }
                    } else {
                        field = Field::None;
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}
