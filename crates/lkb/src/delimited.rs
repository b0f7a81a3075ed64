//! 📄 Delimited text: the lingua franca between the bucket and the duck.
//!
//! 🎬 *[INT. INTERCHANGE FORMAT. a header row walks in. every row after it must match its column count.
//! one row shows up with an extra comma. the header does not forgive.]*
//!
//! Two jobs live here, both on top of the `csv` crate:
//! - [`scan_shape`] reads a buffer once and checks the one invariant that matters: every record
//!   has as many fields as the header. Runs before the engine ever sees the file, so a ragged
//!   file never becomes half a table. It is exactly as picky as the engine about quoting
//!   (a stray `"` mid-field is just a character) and skips lines that hold only whitespace.
//! - [`record_writer`] hands out a `csv::Writer` configured the one way we write: `,`, `\n`,
//!   quotes only where needed, no surprise header. The generator and the engine export both go
//!   through it, so they can't disagree about what a comma means.

use std::io;

use csv::{ByteRecord, ReaderBuilder, Terminator, Writer, WriterBuilder};

/// 📐 What a well-formed delimited buffer looks like from 10,000 feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedShape {
    /// 🏷️ Column count, as declared by the header.
    pub columns: usize,
    /// 📊 Records after the header. Blank lines don't count; they're just vibes.
    pub data_rows: usize,
}

/// 💀 Why a buffer failed the shape check. Line numbers are 1-based physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// 🕳️ Nothing but whitespace. No header, no table, no party.
    MissingHeader,
    /// 📏 A record with the wrong number of fields.
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    /// 🧨 The reader itself gave up.
    Unreadable { message: String },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::MissingHeader => write!(f, "no header row"),
            ShapeError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line} has {found} columns but the header declares {expected}"
            ),
            ShapeError::Unreadable { message } => write!(f, "unreadable delimited text: {message}"),
        }
    }
}

impl std::error::Error for ShapeError {}

/// 🫥 A line of spaces and tabs parses as one whitespace field. The engine shrugs at it, so do we.
fn is_blank(record: &ByteRecord) -> bool {
    record.len() == 1 && record[0].iter().all(|b| b.is_ascii_whitespace())
}

/// 📐 Check the column-count invariant over a whole buffer.
///
/// Empty and whitespace-only lines are skipped. The first non-blank record is the header.
pub fn scan_shape(bytes: &[u8]) -> Result<DelimitedShape, ShapeError> {
    // -- 📏 flexible so a blank line can be looked at before it's judged; the count check is ours
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut record = ByteRecord::new();
    let mut columns: Option<usize> = None;
    let mut data_rows = 0usize;

    loop {
        let more = reader
            .read_byte_record(&mut record)
            .map_err(|err| ShapeError::Unreadable {
                message: err.to_string(),
            })?;
        if !more {
            break;
        }
        if is_blank(&record) {
            continue;
        }

        match columns {
            None => columns = Some(record.len()),
            Some(expected) if expected != record.len() => {
                return Err(ShapeError::RaggedRow {
                    line: record.position().map_or(0, |position| position.line()),
                    expected,
                    found: record.len(),
                });
            }
            Some(_) => data_rows += 1,
        }
    }

    columns
        .map(|columns| DelimitedShape { columns, data_rows })
        .ok_or(ShapeError::MissingHeader)
}

/// ✍️ A `csv::Writer` over `out`: comma, `\n` line ends, minimal quoting, every record the same width.
///
/// No automatic header. Write it yourself with `write_record`; `serialize` then only writes rows,
/// so an empty dataset still gets its header.
pub fn record_writer<W: io::Write>(out: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out)
}

/// 📜 Finish an in-memory writer and take its text.
pub fn into_text(writer: Writer<Vec<u8>>) -> io::Result<String> {
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
