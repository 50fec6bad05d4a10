//! Mapping SandboxMeta errors onto gRPC status codes

use sandboxmeta_common::Error;
use tonic::Status;

/// Convert an error into the status returned to a gRPC caller
#[must_use]
pub fn status_from_error(err: &Error) -> Status {
    match err {
        Error::InvalidKey { .. } | Error::InvalidValue { .. } => {
            Status::invalid_argument(err.to_string())
        }
        Error::Configuration(_) => Status::internal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_from_error(&Error::invalid_key("", "empty")).code(),
            Code::InvalidArgument
        );
        assert_eq!(
            status_from_error(&Error::invalid_value("k", "newline")).code(),
            Code::InvalidArgument
        );
        assert_eq!(
            status_from_error(&Error::configuration("unreadable")).code(),
            Code::Internal
        );
    }

    #[test]
    fn test_status_message() {
        let status = status_from_error(&Error::invalid_key("Bad Key", "contains a space"));
        assert!(status.message().contains("Bad Key"));
    }
}
