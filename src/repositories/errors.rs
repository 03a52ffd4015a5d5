use thiserror::Error;

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("an article with this title already exists")]
    DuplicateTitle,

    #[error("article not found")]
    NotFound,

    #[error("article belongs to another user")]
    Forbidden,

    #[error("no article deleted")]
    NothingDeleted,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Maps a unique violation on `articles.title` to `DuplicateTitle`.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.code().as_deref() == Some(UNIQUE_VIOLATION)
            && db.constraint().is_none_or(|c| c.contains("title"))
        {
            return Self::DuplicateTitle;
        }
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = RepositoryError::from_write(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }
}
