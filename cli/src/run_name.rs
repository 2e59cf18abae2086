use std::sync::Arc;

use parking_lot::RwLock;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{CliError, CliResult};

/// Everything except RFC 3986 unreserved characters is escaped inside a
/// single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Yields the URL path prefix of the run a scoped query targets.
pub trait PrefixSupplier: Send + Sync {
    fn prefix(&self) -> CliResult<String>;
}

/// The active run, from `--run` or `RUN_NAME`.
///
/// Clones share storage, so every query family holding one sees the same
/// value. The name is only validated when a prefix is requested.
#[derive(Debug, Clone, Default)]
pub struct RunName {
    name: Arc<RwLock<String>>,
}

impl RunName {
    #[cfg(test)]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::new(RwLock::new(name.into())),
        }
    }

    pub fn set(&self, name: impl Into<String>) {
        *self.name.write() = name.into();
    }

    pub fn get(&self) -> String {
        self.name.read().clone()
    }
}

impl PrefixSupplier for RunName {
    fn prefix(&self) -> CliResult<String> {
        let name = self.name.read();
        if name.is_empty() {
            return Err(CliError::MissingRun);
        }
        Ok(format!("v1/run/{}/", encode_segment(&name)?))
    }
}

/// Escapes `segment` for use as exactly one path segment.
///
/// Empty, `.` and `..` are rejected: URL resolution drops or collapses them
/// even when percent-encoded, which would move the request to another path.
pub fn encode_segment(segment: &str) -> CliResult<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(CliError::Usage(format!(
            "invalid name '{}': must not be empty, '.' or '..'",
            segment
        )));
    }
    Ok(utf8_percent_encode(segment, PATH_SEGMENT).to_string())
}
