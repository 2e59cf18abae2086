//! Multipart/form-data encoding of run specs for `run add`.
//!
//! The whole spec is buffered in memory before the request is built, so this
//! is only meant for reasonably small spec files.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

use crate::error::{CliError, CliResult};

/// Path argument that selects standard input instead of a file.
pub const STDIN_SENTINEL: &str = "stdin";

/// File name reported in the form when the run spec came from standard input.
const STDIN_FILE_NAME: &str = "stdin";

#[derive(Debug, Error)]
pub enum FormWriterError {
    #[error("multipart writer already closed")]
    Closed,
    #[error("no file part is open")]
    NoFilePart,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Stdin,
    File(String),
}

impl SpecSource {
    pub fn parse(path: &str) -> Self {
        if path == STDIN_SENTINEL {
            SpecSource::Stdin
        } else {
            SpecSource::File(path.to_string())
        }
    }

    /// Name sent as the `filename` of the file part.
    pub fn file_name(&self) -> String {
        match self {
            SpecSource::Stdin => STDIN_FILE_NAME.to_string(),
            SpecSource::File(path) => Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            SpecSource::Stdin => "run spec from stdin".to_string(),
            SpecSource::File(path) => format!("specified run spec file {}", path),
        }
    }
}

/// A finished payload. The boundary inside `content_type` must travel with
/// `body`.
#[derive(Debug, Clone)]
pub struct EncodedForm {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Incremental multipart/form-data writer over any `Write` sink.
pub struct FormWriter<W: Write> {
    out: W,
    boundary: String,
    wrote_part: bool,
    in_file_part: bool,
    closed: bool,
}

impl<W: Write> FormWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_boundary(out, Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(out: W, boundary: impl Into<String>) -> Self {
        Self {
            out,
            boundary: boundary.into(),
            wrote_part: false,
            in_file_part: false,
            closed: false,
        }
    }

    pub fn form_data_content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn write_field(&mut self, name: &str, value: &str) -> Result<(), FormWriterError> {
        self.begin_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            escape_quotes(name)
        ))?;
        self.out.write_all(value.as_bytes())?;
        Ok(())
    }

    pub fn create_form_file(
        &mut self,
        field_name: &str,
        file_name: &str,
    ) -> Result<(), FormWriterError> {
        self.begin_part(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n",
            escape_quotes(field_name),
            escape_quotes(file_name)
        ))?;
        self.in_file_part = true;
        Ok(())
    }

    pub fn write_file_bytes(&mut self, bytes: &[u8]) -> Result<(), FormWriterError> {
        if self.closed {
            return Err(FormWriterError::Closed);
        }
        if !self.in_file_part {
            return Err(FormWriterError::NoFilePart);
        }
        self.out.write_all(bytes)?;
        Ok(())
    }

    /// Writes the trailing boundary. No part can be added afterwards.
    pub fn close(&mut self) -> Result<(), FormWriterError> {
        if self.closed {
            return Err(FormWriterError::Closed);
        }
        if self.wrote_part {
            write!(self.out, "\r\n")?;
        }
        write!(self.out, "--{}--\r\n", self.boundary)?;
        self.out.flush()?;
        self.closed = true;
        self.in_file_part = false;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn begin_part(&mut self, headers: &str) -> Result<(), FormWriterError> {
        if self.closed {
            return Err(FormWriterError::Closed);
        }
        if self.wrote_part {
            write!(self.out, "\r\n")?;
        }
        write!(self.out, "--{}\r\n{}\r\n", self.boundary, headers)?;
        self.wrote_part = true;
        self.in_file_part = false;
        Ok(())
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Reads the run spec (file or stdin) and builds the `type` + `file` form.
pub fn encode_run_spec(spec_type: &str, spec_file: &str) -> CliResult<EncodedForm> {
    let source = SpecSource::parse(spec_file);
    match &source {
        SpecSource::Stdin => {
            eprintln!("Reading spec file from stdin...");
            encode_run_spec_from(spec_type, &source, io::stdin().lock())
        }
        SpecSource::File(path) => {
            let file = fs::File::open(path).map_err(|e| CliError::ReadInput {
                source_desc: source.describe(),
                source: e,
            })?;
            encode_run_spec_from(spec_type, &source, file)
        }
    }
}

/// Buffers everything `reader` yields as the content of `source`.
pub fn encode_run_spec_from<R: Read>(
    spec_type: &str,
    source: &SpecSource,
    reader: R,
) -> CliResult<EncodedForm> {
    let content = read_all(reader, source)?;
    encode_form(spec_type, &source.file_name(), &content)
}

fn read_all<R: Read>(mut reader: R, source: &SpecSource) -> CliResult<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| CliError::ReadInput {
            source_desc: source.describe(),
            source: e,
        })?;
    Ok(buf)
}

pub fn encode_form(spec_type: &str, file_name: &str, content: &[u8]) -> CliResult<EncodedForm> {
    let mut writer = FormWriter::new(Vec::with_capacity(content.len() + 512));
    let content_type = writer.form_data_content_type();

    writer
        .write_field("type", spec_type)
        .map_err(|e| encoding("Failed to write type field", e))?;
    writer
        .create_form_file("file", file_name)
        .map_err(|e| encoding("Failed to create form", e))?;
    writer
        .write_file_bytes(content)
        .map_err(|e| encoding("Failed to store form data", e))?;
    writer
        .close()
        .map_err(|e| encoding("Failed to write form data", e))?;

    let body = writer.into_inner();
    tracing::debug!(
        spec_type,
        file_name,
        content_len = content.len(),
        body_len = body.len(),
        "encoded run spec form"
    );
    Ok(EncodedForm { body, content_type })
}

fn encoding(step: &'static str, source: FormWriterError) -> CliError {
    CliError::Encoding { step, source }
}
