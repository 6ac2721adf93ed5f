//! Per-cell worker fan-out.
//!
//! Queries are purely functional and entity histories are immutable, so
//! the natural parallel unit is the grid cell: one worker per cell, each
//! owning its own iterator, all sharing one [`TemporalQuery`]. Entries
//! stream to the caller over a channel as they are produced; ordering is
//! deterministic *within* a cell (oldest first per entity) but unordered
//! across cells.
//!
//! Within one iterator nothing is ever parallel — this module only fans
//! out across cells.

use std::sync::Arc;

use strata_store::EntityHistory;

use crate::contribution::{Contribution, SnapshotEntry};
use crate::error::QueryError;
use crate::iter::TemporalQuery;

/// One grid cell's worth of candidate entities.
pub type Cell = Vec<Arc<EntityHistory>>;

/// Run a contribution iterator per cell, streaming every entry to
/// `sink` on the calling thread.
///
/// The sink sees entries as workers produce them; when the call
/// returns, every cell has been fully iterated.
///
/// # Errors
///
/// [`QueryError::IntervalRequired`] when the query timeline is an
/// instant list. Checked before any worker spawns.
pub fn contributions_per_cell<F>(
    query: &TemporalQuery,
    cells: Vec<Cell>,
    mut sink: F,
) -> Result<(), QueryError>
where
    F: FnMut(Contribution),
{
    // Surface configuration mismatch before spawning anything.
    query.contributions(Vec::new())?;

    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::scope(|scope| {
        for cell in cells {
            let tx = tx.clone();
            scope.spawn(move || {
                let iter = query
                    .contributions(cell)
                    .expect("timeline checked before spawn");
                for entry in iter {
                    if tx.send(entry).is_err() {
                        return;
                    }
                }
            });
        }
        drop(tx);
        for entry in rx {
            sink(entry);
        }
    });
    Ok(())
}

/// Run a snapshot iterator per cell, streaming every entry to `sink`
/// on the calling thread.
///
/// # Errors
///
/// [`QueryError::InstantsRequired`] when the query timeline is an
/// interval. Checked before any worker spawns.
pub fn snapshots_per_cell<F>(
    query: &TemporalQuery,
    cells: Vec<Cell>,
    mut sink: F,
) -> Result<(), QueryError>
where
    F: FnMut(SnapshotEntry),
{
    query.snapshots(Vec::new())?;

    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::scope(|scope| {
        for cell in cells {
            let tx = tx.clone();
            scope.spawn(move || {
                let iter = query
                    .snapshots(cell)
                    .expect("timeline checked before spawn");
                for entry in iter {
                    if tx.send(entry).is_err() {
                        return;
                    }
                }
            });
        }
        drop(tx);
        for entry in rx {
            sink(entry);
        }
    });
    Ok(())
}
