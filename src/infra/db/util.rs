use crate::application::repos::RepoError;

/// Translate driver-level failures into the repository error taxonomy.
/// Unique violations are classified by the driver's error code rather
/// than by message text; anything else is an opaque persistence failure.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        other => RepoError::from_persistence(other),
    }
}
