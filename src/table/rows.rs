//! Lazy row sequences
//!
//! The first page seeks to its starting position with `LIMIT`/`OFFSET`.
//! Every later page continues from the order key of the last row handed out
//! (`WHERE <order> > ?` forwards, `< ?` with `DESC` backwards), so a full
//! scan reads each row once. Small strides read one covering window per page
//! and pick from it; large strides skip the gap inside SQLite and fetch one
//! row per step.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use rusqlite::types::Value;

use crate::errors::{TableError, TableResult};

use super::record::{KeyedRow, RecordTable};
use super::row::RawRow;
use super::slice::ResolvedSlice;

/// Positions fetched per page
const PAGE_SIZE: u64 = 256;

/// Widest stride still served from a covering window
const MAX_WINDOW_STRIDE: u64 = 16;

/// A lazy, finite sequence of finalized rows.
///
/// Restart by asking the table for a new sequence; the data does not change
/// during a session.
pub struct Rows<'t, T> {
    table: &'t RecordTable<T>,
    slice: ResolvedSlice,
    /// Positions already pulled into the buffer
    fetched: u64,
    /// Items already yielded
    emitted: u64,
    /// Order key of the last row pulled into the buffer
    cursor: Option<Value>,
    buffer: VecDeque<RawRow>,
    done: bool,
}

impl<'t, T> Rows<'t, T> {
    pub(crate) fn new(table: &'t RecordTable<T>, slice: ResolvedSlice) -> Self {
        Self {
            table,
            slice,
            fetched: 0,
            emitted: 0,
            cursor: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Items left to yield
    pub fn remaining(&self) -> u64 {
        self.slice.count - self.emitted
    }

    fn refill(&mut self) -> TableResult<()> {
        let stride = self.slice.step.unsigned_abs();
        let page = if stride <= MAX_WINDOW_STRIDE { PAGE_SIZE } else { 1 };
        let n = page.min(self.slice.count - self.fetched);

        let picked = match self.cursor.take() {
            None => self.seek(n)?,
            Some(key) => self.advance(&key, stride, n)?,
        };

        if let Some((key, _)) = picked.last() {
            self.cursor = Some(key.clone());
        }
        self.buffer.extend(picked.into_iter().map(|(_, row)| row));
        self.fetched += n;
        Ok(())
    }

    /// First page: read the window covering its positions by offset.
    fn seek(&self, n: u64) -> TableResult<Vec<KeyedRow>> {
        let first = self.slice.position(self.fetched);
        let last = self.slice.position(self.fetched + n - 1);
        let low = first.min(last);
        let width = first.max(last) - low + 1;

        let window = self.table.fetch_window(low, width)?;
        let indices = (0..n).map(|k| self.slice.position(self.fetched + k) - low);
        pick(window, indices)
    }

    /// Later pages: continue from the last row handed out.
    fn advance(&self, key: &Value, stride: u64, n: u64) -> TableResult<Vec<KeyedRow>> {
        let forward = self.slice.step > 0;

        if stride <= MAX_WINDOW_STRIDE {
            let window = self.table.fetch_keyed(key, forward, 0, n * stride)?;
            pick(window, (1..=n).map(|k| k * stride - 1))
        } else {
            let window = self.table.fetch_keyed(key, forward, stride - 1, 1)?;
            pick(window, std::iter::once(0))
        }
    }
}

/// Take the rows at `indices` out of `window`, in the order given.
fn pick(window: Vec<KeyedRow>, indices: impl Iterator<Item = u64>) -> TableResult<Vec<KeyedRow>> {
    let len = window.len() as u64;
    let mut window: Vec<Option<KeyedRow>> = window.into_iter().map(Some).collect();
    indices
        .map(|index| {
            window
                .get_mut(index as usize)
                .and_then(Option::take)
                .ok_or_else(|| TableError::index_out_of_range(index as i64, len))
        })
        .collect()
}

impl<'t, T> Iterator for Rows<'t, T> {
    type Item = TableResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.emitted >= self.slice.count {
            return None;
        }

        if self.buffer.is_empty() {
            if let Err(e) = self.refill() {
                self.done = true;
                return Some(Err(e));
            }
        }

        let row = self.buffer.pop_front()?;
        self.emitted += 1;
        Some(Ok(self.table.finalize(row)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (0, Some(remaining))
    }
}

impl<'t, T> FusedIterator for Rows<'t, T> {}
