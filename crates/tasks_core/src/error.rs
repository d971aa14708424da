use crate::model::ListKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("index_error - index {index} is out of range for {list} list of length {len}")]
    IndexOutOfRange {
        list: ListKind,
        index: i64,
        len: usize,
    },
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
}

impl AppError {
    pub fn index_out_of_range(list: ListKind, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            list,
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }
    }

    /// For positions taken from outside the crate, where a caller may send
    /// a negative value.
    pub fn negative_index(list: ListKind, index: i64, len: usize) -> Self {
        Self::IndexOutOfRange { list, index, len }
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "index_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use crate::model::ListKind;

    #[test]
    fn index_error_names_list_and_bounds() {
        let err = AppError::index_out_of_range(ListKind::Completed, 4, 2);
        assert_eq!(err.code(), "index_error");
        assert_eq!(
            err.to_string(),
            "index_error - index 4 is out of range for completed list of length 2"
        );
    }

    #[test]
    fn negative_index_is_an_index_error() {
        let err = AppError::negative_index(ListKind::Pending, -1, 3);
        assert_eq!(err.code(), "index_error");
        assert_eq!(
            err.to_string(),
            "index_error - index -1 is out of range for pending list of length 3"
        );
    }

    #[test]
    fn display_prefixes_code() {
        let err = AppError::io("disk full");
        assert_eq!(err.to_string(), "io_error - disk full");
    }
}
