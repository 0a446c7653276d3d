//! `multipart/form-data` forms on top of `reqwest::blocking::multipart`.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::sync::mpsc::Sender;

use reqwest::blocking::multipart::{Form, Part};

use crate::transport::{HandOff, Sent};
use crate::{ParamValue, Parameters, Result};

/// Upper bound of a single read from a streamed attachment.
pub const CHUNK_SIZE: usize = 4096;

const OCTET_STREAM: &str = "application/octet-stream";
const DEFAULT_FILENAME: &str = "file";

/// Build the multipart form for `params`.
///
/// Text values become plain parts. Bytes, streams and files become
/// `application/octet-stream` parts with the filename `file`, or the base
/// name of the file. Files are opened here, so a missing file fails before
/// anything is sent; their content is streamed in chunks of at most
/// [`CHUNK_SIZE`] bytes.
pub fn form(params: Parameters) -> Result<Form> {
    build_form(params, None)
}

/// Like [`form`], reporting [`Sent::Body`] on `written` once the last part
/// has been read to its end.
pub(crate) fn build_form(params: Parameters, mut written: Option<Sender<Sent>>) -> Result<Form> {
    if params.is_empty() {
        if let Some(tx) = written.take() {
            let _ = tx.send(Sent::Body);
        }
    }

    let count = params.len();
    let mut form = Form::new();
    for (index, (key, value)) in params.into_iter().enumerate() {
        let signal = if index + 1 == count {
            written.take()
        } else {
            None
        };
        form = form.part(key, part(value, signal)?);
    }
    Ok(form)
}

fn part(value: ParamValue, written: Option<Sender<Sent>>) -> Result<Part> {
    let binary = value.is_binary();
    let part = match (value, written) {
        (ParamValue::Text(text), None) => return Ok(Part::text(text)),
        (ParamValue::Bytes(bytes), None) => Part::bytes(bytes).file_name(DEFAULT_FILENAME),
        (ParamValue::Stream(reader), written) => {
            Part::reader(signalled(Chunked::new(reader), written, None))
                .file_name(DEFAULT_FILENAME)
        }
        (ParamValue::File(path), written) => {
            let file = File::open(&path)?;
            let len = file.metadata()?.len();
            Part::reader_with_length(signalled(Chunked::new(file), written, Some(len)), len)
                .file_name(file_name(&path))
        }
        (ParamValue::Text(text), Some(tx)) => {
            let len = text.len() as u64;
            let reader = HandOff::new(Cursor::new(text.into_bytes()), tx, Some(len));
            Part::reader_with_length(reader, len)
        }
        (ParamValue::Bytes(bytes), Some(tx)) => {
            let len = bytes.len() as u64;
            Part::reader_with_length(HandOff::new(Cursor::new(bytes), tx, Some(len)), len)
                .file_name(DEFAULT_FILENAME)
        }
    };

    if binary {
        Ok(part.mime_str(OCTET_STREAM)?)
    } else {
        Ok(part)
    }
}

fn signalled<R>(reader: R, written: Option<Sender<Sent>>, len: Option<u64>) -> Box<dyn Read + Send>
where
    R: Read + Send + 'static,
{
    match written {
        Some(tx) => Box::new(HandOff::new(reader, tx, len)),
        None => Box::new(reader),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Caps every read of the wrapped reader at [`CHUNK_SIZE`] bytes.
pub(crate) struct Chunked<R> {
    inner: R,
}

impl<R: Read> Chunked<R> {
    pub(crate) fn new(inner: R) -> Self {
        Chunked { inner }
    }
}

impl<R: Read> Read for Chunked<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = buf.len().min(CHUNK_SIZE);
        self.inner.read(&mut buf[..limit])
    }
}
