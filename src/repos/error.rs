/*
 * Responsibility
 * - what the repos report upward (storage details stay here)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("referenced row does not exist")]
    ForeignKey,
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        // 23503: foreign_key_violation
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23503")
        {
            return RepoError::ForeignKey;
        }
        RepoError::Db(e)
    }
}
