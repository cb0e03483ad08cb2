use dframe::FrameError;

pub type SqlResult<T> = Result<T, SqlError>;

#[derive(Debug, thiserror::Error)]
pub enum SqlError {
    #[error("{message}")]
    Open {
        message: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{message}")]
    Read {
        message: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{message}")]
    Write {
        message: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid combination: {0}")]
    InvalidCombination(String),

    #[error("unsupported column value type: {0}")]
    UnsupportedColumnType(String),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl SqlError {
    pub(crate) fn open(source: rusqlite::Error) -> Self {
        SqlError::Open {
            message: "Error opening connection",
            source,
        }
    }

    pub(crate) fn read(source: rusqlite::Error) -> Self {
        SqlError::Read {
            message: "Error loading data from DB",
            source,
        }
    }

    pub(crate) fn write(source: rusqlite::Error) -> Self {
        SqlError::Write {
            message: "Error updating data in DB",
            source,
        }
    }
}
