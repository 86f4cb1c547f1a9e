//! Write transaction helpers.
//!
//! Every multi-step write takes the `SQLite` write lock up front with
//! `BEGIN IMMEDIATE`. Reads performed afterwards inside the transaction see
//! every previously committed write and no other writer can interleave.

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::{in_transaction, is_busy, Error, Result};

use super::connection::Database;

impl Database {
    /// Begins an immediate (write-locking) transaction.
    ///
    /// The returned guard rolls back when dropped without a commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if another writer holds the lock past
    /// the configured busy timeout.
    pub fn begin_immediate(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.config.lock_wait_seconds();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| {
                if is_busy(&e) {
                    log::warn!("write lock not acquired within {seconds}s");
                    Error::LockTimeout { seconds }
                } else {
                    Error::Database(e)
                }
            })
    }

    /// Runs `f` inside an immediate transaction.
    ///
    /// Commits when `f` returns `Ok`; any error drops the guard, which rolls
    /// back every statement `f` executed. Raw database errors raised by `f`
    /// surface as [`Error::TransactionFailure`] tagged with `operation`.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, a lock timeout, or a
    /// [`Error::TransactionFailure`] if the commit itself fails.
    pub fn write<T, F>(&mut self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.begin_immediate()?;
        log::debug!("{operation}: transaction started");
        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(in_transaction(operation))?;
                log::debug!("{operation}: committed");
                Ok(value)
            }
            Err(e) => {
                log::debug!("{operation}: rolling back ({e})");
                drop(tx);
                Err(match e {
                    Error::Database(source) => Error::TransactionFailure {
                        operation: operation.to_string(),
                        source,
                    },
                    other => other,
                })
            }
        }
    }
}
