use thiserror::Error;

use crate::http_client::TransportError;
use crate::multipart::FormWriterError;

pub const EXIT_GENERIC_FAILURE: i32 = 1;
pub const EXIT_USAGE_FAILURE: i32 = 2;
pub const EXIT_TRANSPORT_FAILURE: i32 = 4;

/// Failure of a single command invocation. `main` prints it once and exits
/// with [`CliError::exit_code`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing required '--run' argument or 'RUN_NAME' envvar")]
    MissingRun,

    #[error("{0}")]
    Usage(String),

    #[error("Failed to read {source_desc}: {source}")]
    ReadInput {
        source_desc: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step}: {source}")]
    Encoding {
        step: &'static str,
        #[source]
        source: FormWriterError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid response: {0}")]
    Response(String),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingRun | CliError::Usage(_) => EXIT_USAGE_FAILURE,
            CliError::Transport(_) => EXIT_TRANSPORT_FAILURE,
            CliError::ReadInput { .. }
            | CliError::Encoding { .. }
            | CliError::Response(_)
            | CliError::Output(_) => EXIT_GENERIC_FAILURE,
        }
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        assert_eq!(CliError::MissingRun.exit_code(), EXIT_USAGE_FAILURE);
        assert_eq!(
            CliError::Usage("bad --param".into()).exit_code(),
            EXIT_USAGE_FAILURE
        );
        let read = CliError::ReadInput {
            source_desc: "run spec from stdin".into(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        };
        assert_eq!(read.exit_code(), EXIT_GENERIC_FAILURE);
        let encode = CliError::Encoding {
            step: "Failed to create form",
            source: FormWriterError::Closed,
        };
        assert_eq!(encode.exit_code(), EXIT_GENERIC_FAILURE);
    }

    #[test]
    fn read_and_encode_failures_are_distinguishable() {
        let read = CliError::ReadInput {
            source_desc: "specified run spec file /nope.yml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(read.to_string().starts_with("Failed to read specified run spec file"));

        let encode = CliError::Encoding {
            step: "Failed to store form data",
            source: FormWriterError::Closed,
        };
        assert!(encode.to_string().starts_with("Failed to store form data"));
    }
}
