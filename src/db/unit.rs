//! Unit of work: one store transaction plus the batch aggregator that
//! decides whether it commits.
//!
//! Every multi-statement write runs inside a [`UnitOfWork`]. Sibling
//! statements (the episode inserts of a title, the display episodes of a
//! mirror sync) are issued together with [`UnitOfWork::fan_out`]; the unit
//! only decides after every outcome has arrived, and [`UnitOfWork::finish`]
//! consumes the unit so commit or rollback happens exactly once.

use futures::future::join_all;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, RuntimeErr, SqlErr,
    TransactionTrait,
};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("{0} not found")]
    NotFound(String),

    /// The candidate title id was taken between the `max(id)` read and the insert.
    #[error("Title id {0} is already taken")]
    IdCollision(i32),

    #[error("No title id left after {0}")]
    IdSpaceExhausted(i32),

    #[error("Statement {index} of {total} in batch failed: {source}")]
    Batch {
        index: usize,
        total: usize,
        #[source]
        source: DbErr,
    },

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl UnitError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Failures that a fresh attempt of the whole unit may get past: a
    /// concurrently taken id, or a write lock not granted within the
    /// store's busy timeout.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::IdCollision(_) => true,
            Self::Db(e) | Self::Batch { source: e, .. } => is_lock_contention(e),
            Self::NotFound(_) | Self::IdSpaceExhausted(_) => false,
        }
    }
}

impl From<BatchFailure<DbErr>> for UnitError {
    fn from(f: BatchFailure<DbErr>) -> Self {
        Self::Batch {
            index: f.index,
            total: f.total,
            source: f.source,
        }
    }
}

pub type UnitResult<T> = Result<T, UnitError>;

/// True when the store rejected a write for breaking a unique or primary key.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True for SQLite `BUSY`/`LOCKED`, including their extended codes.
pub fn is_lock_contention(err: &DbErr) -> bool {
    let (DbErr::Conn(RuntimeErr::SqlxError(e))
    | DbErr::Exec(RuntimeErr::SqlxError(e))
    | DbErr::Query(RuntimeErr::SqlxError(e))) = err
    else {
        return false;
    };

    e.as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6))
}

/// A write statement that matches no row. SQLite opens transactions as
/// DEFERRED, so without it two units could both read and then deadlock on
/// the upgrade to a write lock. Issued first, the lock is taken before any
/// read and waits on the busy timeout like `BEGIN IMMEDIATE`.
const CLAIM_WRITE_LOCK: &str = "UPDATE titles SET views = views WHERE 0";

/// First failure of a fan-out batch, in submission order.
#[derive(Debug, PartialEq, Eq)]
pub struct BatchFailure<E> {
    pub index: usize,
    pub total: usize,
    pub source: E,
}

/// Joins the outcomes of a batch into a single decision.
///
/// All outcomes are inspected; a batch with any failure fails as a whole and
/// reports the earliest one. An empty batch succeeds.
pub fn aggregate_batch<T, E>(outcomes: Vec<Result<T, E>>) -> Result<Vec<T>, BatchFailure<E>> {
    let total = outcomes.len();
    let mut values = Vec::with_capacity(total);

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(v) => values.push(v),
            Err(source) => {
                return Err(BatchFailure {
                    index,
                    total,
                    source,
                });
            }
        }
    }

    Ok(values)
}

pub struct UnitOfWork {
    txn: DatabaseTransaction,
    operation: &'static str,
}

impl UnitOfWork {
    /// Opens a transaction holding the store's write lock.
    pub async fn begin(conn: &DatabaseConnection, operation: &'static str) -> UnitResult<Self> {
        let txn = conn.begin().await?;

        if let Err(e) = txn.execute_unprepared(CLAIM_WRITE_LOCK).await {
            if let Err(rollback) = txn.rollback().await {
                error!(operation, error = %rollback, "Rollback failed");
            }
            record(operation, "failed");
            return Err(e.into());
        }

        debug!(operation, "Unit opened");
        Ok(Self { txn, operation })
    }

    #[must_use]
    pub const fn txn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Drives every statement of a sibling batch to completion, then
    /// aggregates.
    pub async fn fan_out<I, F, T>(&self, statements: I) -> UnitResult<Vec<T>>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<T, DbErr>>,
    {
        let outcomes = join_all(statements).await;
        aggregate_batch(outcomes).map_err(UnitError::from)
    }

    /// Commits on `Ok`, rolls back on `Err`, and hands the outcome back.
    pub async fn finish<T>(self, outcome: UnitResult<T>) -> UnitResult<T> {
        let operation = self.operation;

        match outcome {
            Ok(value) => {
                if let Err(e) = self.txn.commit().await {
                    error!(operation, error = %e, "Commit failed");
                    record(operation, "failed");
                    return Err(e.into());
                }
                debug!(operation, "Unit committed");
                record(operation, "committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = self.txn.rollback().await {
                    error!(operation, error = %e, "Rollback failed");
                }
                match &err {
                    UnitError::NotFound(_) => debug!(operation, "Unit rolled back: {err}"),
                    _ => error!(operation, error = %err, "Unit rolled back"),
                }
                record(operation, "rolled_back");
                Err(err)
            }
        }
    }
}

fn record(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "catalog_units_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
