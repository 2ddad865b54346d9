//! Binary persistence of an index.
//!
//! ## Format
//!
//! All integers use the byte order of the machine writing the file, and
//! `word` is the platform's pointer width. Files are therefore only portable
//! between machines of the same endianness and word size.
//!
//! ```text
//! [total_docs: i32]
//! [document_count: word]
//! For each document (in id order):
//!   [id_len: word] [id: UTF-8 bytes]
//!   [content_len: word] [content: UTF-8 bytes]
//!   [tag_count: word]
//!   For each tag (in sorted order):
//!     [tag_len: word] [tag: UTF-8 bytes]
//!   [click_count: u32]
//! ```
//!
//! Only documents are stored. The tag index, content index and frequency
//! counters are rebuilt on load by inserting every document again, so a loaded
//! store is consistent by construction.
//!
//! Click counts are written but not restored: loaded documents start with a
//! count of zero.

use crate::document::Document;
use crate::index::IndexStore;
use byteorder::{ByteOrder, NativeEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use std::mem::size_of;

const WORD: usize = size_of::<usize>();

/// What a successful load found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
  /// The document total recorded in the file header.
  pub declared: i32,
  /// The number of documents actually decoded.
  pub loaded: usize,
}

impl LoadReport {
  /// Whether the header agrees with the decoded documents.
  pub fn is_consistent(&self) -> bool {
    usize::try_from(self.declared).is_ok_and(|declared| declared == self.loaded)
  }
}

/// Writes every document of `store` to `writer`.
///
/// The writer is not flushed.
pub fn save<W: Write>(store: &IndexStore, writer: &mut W) -> io::Result<()> {
  let total = i32::try_from(store.total_docs()).map_err(|_| {
    io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("{} documents do not fit the header", store.total_docs()),
    )
  })?;
  writer.write_i32::<NativeEndian>(total)?;

  let ids = store.document_ids();
  write_word(writer, ids.len())?;

  for id in &ids {
    let Some(doc) = store.get(id) else {
      continue;
    };
    write_str(writer, doc.id())?;
    write_str(writer, doc.content())?;
    write_word(writer, doc.tags().len())?;
    for tag in doc.tags() {
      write_str(writer, tag)?;
    }
    writer.write_u32::<NativeEndian>(doc.click_count())?;
  }

  Ok(())
}

/// Decodes an index from `reader`.
///
/// An empty input, or an input that ends right after a zero `total_docs`
/// header, decodes to an empty store. Any other short read fails with
/// [`io::ErrorKind::UnexpectedEof`]; undecodable text, an invalid document or
/// a repeated id fails with [`io::ErrorKind::InvalidData`].
pub fn load<R: Read>(reader: &mut R) -> io::Result<(IndexStore, LoadReport)> {
  let mut store = IndexStore::new();

  let mut header = [0u8; 4];
  if !fill_or_eof(reader, &mut header)? {
    return Ok((store, LoadReport { declared: 0, loaded: 0 }));
  }
  let declared = NativeEndian::read_i32(&header);

  let mut count = [0u8; WORD];
  if !fill_or_eof(reader, &mut count)? {
    if declared == 0 {
      return Ok((store, LoadReport { declared, loaded: 0 }));
    }
    return Err(truncated("document count"));
  }
  let count = word_from_bytes(&count)?;

  for _ in 0..count {
    let id = read_string(reader, "document id")?;
    let content = read_string(reader, "document content")?;
    let mut doc = Document::new(id, content, Vec::<String>::new()).map_err(invalid_data)?;

    let tag_count = read_word(reader)?;
    for _ in 0..tag_count {
      let tag = read_string(reader, "tag")?;
      doc.add_tag(tag).map_err(invalid_data)?;
    }

    // Stored for compatibility; loaded documents restart from zero.
    let _clicks = reader.read_u32::<NativeEndian>()?;

    store.add(doc).map_err(invalid_data)?;
  }

  let loaded = store.len();
  Ok((store, LoadReport { declared, loaded }))
}

fn write_word<W: Write>(writer: &mut W, value: usize) -> io::Result<()> {
  writer.write_uint::<NativeEndian>(value as u64, WORD)
}

fn write_str<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
  write_word(writer, value.len())?;
  writer.write_all(value.as_bytes())
}

fn read_word<R: Read>(reader: &mut R) -> io::Result<usize> {
  let value = reader.read_uint::<NativeEndian>(WORD)?;
  usize::try_from(value).map_err(|_| invalid_data(format!("length {value} overflows")))
}

fn word_from_bytes(bytes: &[u8]) -> io::Result<usize> {
  let value = NativeEndian::read_uint(bytes, WORD);
  usize::try_from(value).map_err(|_| invalid_data(format!("length {value} overflows")))
}

fn read_string<R: Read>(reader: &mut R, field: &str) -> io::Result<String> {
  let len = read_word(reader)?;
  let mut bytes = Vec::new();
  reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
  if bytes.len() != len {
    return Err(truncated(field));
  }
  String::from_utf8(bytes).map_err(|e| invalid_data(format!("{field} is not valid UTF-8: {e}")))
}

/// Fills `buf` completely, or returns `false` if the input ended before its
/// first byte.
fn fill_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
  let mut filled = 0;
  while filled < buf.len() {
    match reader.read(&mut buf[filled..]) {
      Ok(0) if filled == 0 => return Ok(false),
      Ok(0) => return Err(truncated("header")),
      Ok(n) => filled += n,
      Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
      Err(e) => return Err(e),
    }
  }
  Ok(true)
}

fn truncated(field: &str) -> io::Error {
  io::Error::new(io::ErrorKind::UnexpectedEof, format!("index truncated while reading {field}"))
}

fn invalid_data(error: impl ToString) -> io::Error {
  io::Error::new(io::ErrorKind::InvalidData, error.to_string())
}
