//! Reference records sharing one alignment start.

use ahash::AHashMap;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::bam_io::PositionKey;
use crate::compare::identity::is_same_read;

/// Reference records that start at the same position, in stream order.
///
/// Records are removed as they are matched; slots keep the original order so the
/// remaining records drain in the order they were read.
#[derive(Debug)]
pub struct ReadGroup {
    key: PositionKey,
    slots: Vec<Option<RecordBuf>>,
    by_name: AHashMap<Vec<u8>, Vec<usize>>,
    remaining: usize,
}

impl ReadGroup {
    #[must_use]
    pub fn new(key: PositionKey) -> Self {
        Self { key, slots: Vec::new(), by_name: AHashMap::new(), remaining: 0 }
    }

    #[must_use]
    pub fn key(&self) -> PositionKey {
        self.key
    }

    pub fn push(&mut self, record: RecordBuf) {
        let name = name_key(&record);
        self.by_name.entry(name).or_default().push(self.slots.len());
        self.slots.push(Some(record));
        self.remaining += 1;
    }

    /// Number of records not yet matched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remaining
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Remove and return the record that is the same read as `record`.
    ///
    /// When several records qualify, `choose` picks one by index into the candidates, which
    /// are given in group order. An out-of-range choice falls back to the first candidate.
    pub fn take_match<F>(&mut self, record: &RecordBuf, choose: F) -> Option<RecordBuf>
    where
        F: FnOnce(&[&RecordBuf]) -> usize,
    {
        let indices = self.by_name.get(&name_key(record))?;
        let candidates: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| self.slots[i].as_ref().is_some_and(|r| is_same_read(r, record)))
            .collect();

        let slot = match candidates.as_slice() {
            [] => return None,
            [only] => *only,
            many => {
                let records: Vec<&RecordBuf> =
                    many.iter().filter_map(|&i| self.slots[i].as_ref()).collect();
                many.get(choose(&records)).copied().unwrap_or(many[0])
            }
        };

        let taken = self.slots[slot].take();
        if taken.is_some() {
            self.remaining -= 1;
        }
        taken
    }

    /// Consume the group, yielding unmatched records in stream order.
    pub fn drain(self) -> impl Iterator<Item = RecordBuf> {
        self.slots.into_iter().flatten()
    }
}

fn name_key(record: &RecordBuf) -> Vec<u8> {
    record.name().map(|name| name.to_vec()).unwrap_or_default()
}
