//! NoSuchName retry for batched GETs.
//!
//! An SNMPv1 agent answers a batch containing one unknown OID with
//! `noSuchName` and the 1-based index of the culprit, and returns no data
//! at all. With retry enabled the session marks the culprit invalid,
//! re-sends the original request without every invalid position and repeats
//! until the agent answers cleanly or nothing is left to ask for.
//!
//! Agents differ in which culprit they report first. When indices arrive
//! in descending order they point straight into the original request. When
//! they arrive in ascending (or equal) order, every earlier elision shifted
//! the culprit left by one, so the retry count is added back. An agent that
//! mixes the two orders across retries defeats this bookkeeping; the
//! coordinator bounds the number of rounds and reports an out-of-range
//! position as a protocol error rather than looping.

use crate::error::{Error, ErrorStatus, Result};
use crate::pdu::Pdu;
use smallvec::SmallVec;

/// Set of request positions (zero-based) known to be invalid.
///
/// Batches of up to 192 positions stay inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidityBitmap {
    words: SmallVec<[u64; 3]>,
    len: usize,
}

impl InvalidityBitmap {
    /// Bitmap over `len` positions, none set.
    pub fn new(len: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, len.div_ceil(64)),
            len,
        }
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the bitmap covers no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mark `pos`. Returns `false` when `pos` is out of range.
    pub fn set(&mut self, pos: usize) -> bool {
        if pos >= self.len {
            return false;
        }
        self.words[pos / 64] |= 1 << (pos % 64);
        true
    }

    /// Whether `pos` is marked.
    pub fn is_set(&self, pos: usize) -> bool {
        pos < self.len && self.words[pos / 64] & (1 << (pos % 64)) != 0
    }

    /// Number of marked positions.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Unmarked positions in ascending order.
    pub fn valid_positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&pos| !self.is_set(pos))
    }
}

/// Bookkeeping for one batch's retry loop.
#[derive(Debug)]
pub(crate) struct NoSuchRetry {
    invalid: InvalidityBitmap,
    last_error_index: u32,
    retry_num: usize,
}

impl NoSuchRetry {
    pub(crate) fn new(batch_len: usize) -> Self {
        Self {
            invalid: InvalidityBitmap::new(batch_len),
            last_error_index: 0,
            retry_num: 0,
        }
    }

    /// Record a `noSuchName` response's error index against the original
    /// request.
    pub(crate) fn record(&mut self, error_index: i32) -> Result<()> {
        let protocol_error = || Error::Snmp {
            status: ErrorStatus::NoSuchName,
            index: u32::try_from(error_index).unwrap_or(0),
        };

        let index = u32::try_from(error_index)
            .ok()
            .filter(|&i| i > 0)
            .ok_or_else(protocol_error)?;
        if self.retry_num >= self.invalid.len() {
            return Err(protocol_error());
        }

        let base = index as usize - 1;
        let pos = if self.last_error_index == 0 || index < self.last_error_index {
            base
        } else {
            base + self.retry_num
        };
        if !self.invalid.set(pos) {
            return Err(protocol_error());
        }

        tracing::debug!(
            target: "async_snmp_session::retry",
            { snmp.error_index = index, position = pos, retry = self.retry_num },
            "eliding noSuchName position"
        );
        self.last_error_index = index;
        Ok(())
    }

    /// The original request without any invalid position, or `None` when
    /// nothing remains.
    pub(crate) fn next_request(&mut self, original: &Pdu) -> Option<Pdu> {
        self.retry_num += 1;
        let next = original.without_positions(|pos| self.invalid.is_set(pos));
        (!next.varbinds.is_empty()).then_some(next)
    }

    pub(crate) fn invalid(&self) -> &InvalidityBitmap {
        &self.invalid
    }

    pub(crate) fn into_invalid(self) -> InvalidityBitmap {
        self.invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn batch(n: u32) -> Pdu {
        let oids: Vec<_> = (1..=n).map(|i| oid!(1, 3, 6, 1, 99, i)).collect();
        Pdu::get_request(1, &oids)
    }

    fn marked(retry: &NoSuchRetry) -> Vec<usize> {
        (0..retry.invalid().len())
            .filter(|&p| retry.invalid().is_set(p))
            .collect()
    }

    #[test]
    fn test_bitmap_inline_and_spilled() {
        let mut small = InvalidityBitmap::new(4);
        assert!(small.set(3));
        assert!(!small.set(4));
        assert_eq!(small.count(), 1);
        assert_eq!(small.valid_positions().collect::<Vec<_>>(), vec![0, 1, 2]);

        let mut large = InvalidityBitmap::new(500);
        assert!(large.set(0));
        assert!(large.set(499));
        assert!(large.is_set(499));
        assert!(!large.is_set(498));
        assert_eq!(large.count(), 2);
    }

    #[test]
    fn test_ascending_indices_compensate() {
        let original = batch(4);
        let mut retry = NoSuchRetry::new(4);

        retry.record(3).unwrap();
        let next = retry.next_request(&original).unwrap();
        assert_eq!(next.varbinds.len(), 3);

        retry.record(3).unwrap();
        assert_eq!(marked(&retry), vec![2, 3]);
    }

    #[test]
    fn test_descending_indices_point_into_original() {
        let original = batch(4);
        let mut retry = NoSuchRetry::new(4);

        retry.record(3).unwrap();
        retry.next_request(&original).unwrap();

        retry.record(1).unwrap();
        assert_eq!(marked(&retry), vec![0, 2]);

        let next = retry.next_request(&original).unwrap();
        let oids: Vec<_> = next.oids().cloned().collect();
        assert_eq!(oids, vec![oid!(1, 3, 6, 1, 99, 2), oid!(1, 3, 6, 1, 99, 4)]);
    }

    #[test]
    fn test_everything_elided() {
        let original = batch(1);
        let mut retry = NoSuchRetry::new(1);
        retry.record(1).unwrap();
        assert!(retry.next_request(&original).is_none());
    }

    #[test]
    fn test_out_of_range_index_is_protocol_error() {
        let mut retry = NoSuchRetry::new(2);
        assert!(matches!(
            retry.record(5),
            Err(Error::Snmp {
                status: ErrorStatus::NoSuchName,
                index: 5
            })
        ));
        assert!(retry.record(0).is_err());
        assert!(retry.record(-1).is_err());
    }

    #[test]
    fn test_retries_are_bounded() {
        let original = batch(2);
        let mut retry = NoSuchRetry::new(2);
        retry.record(1).unwrap();
        retry.next_request(&original).unwrap();
        retry.record(1).unwrap();
        assert!(retry.next_request(&original).is_none());
        assert!(retry.record(1).is_err());
    }
}
