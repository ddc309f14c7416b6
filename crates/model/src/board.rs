//! The scoreboard is a fixed-size slice of slots. Occupied slots form a
//! prefix sorted by score descending; the remaining slots hold the
//! sentinel (default key, zero score).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of slots in a scoreboard.
pub const MAX_CAPACITY: usize = 32;

/// A scoreboard slot.
pub trait RankedSlot {
    /// Participant identity. The default value marks an empty slot.
    type Key: Clone + Eq + Default;

    /// Create a slot from parts.
    fn from_parts(key: Self::Key, score: u64) -> Self
    where
        Self: Sized;

    /// Identity held by this slot.
    fn key(&self) -> &Self::Key;

    /// Score held by this slot.
    fn score(&self) -> u64;

    /// Overwrite the score.
    fn set_score(&mut self, score: u64);

    /// Returns whether this slot is the empty sentinel.
    fn is_empty(&self) -> bool {
        *self.key() == Self::Key::default()
    }
}

/// A plain `(key, score)` slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry<K> {
    /// Participant identity.
    pub key: K,
    /// Score.
    pub score: u64,
}

impl<K> Entry<K> {
    /// Create a new entry.
    pub fn new(key: K, score: u64) -> Self {
        Self { key, score }
    }
}

impl<K: Clone + Eq + Default> RankedSlot for Entry<K> {
    type Key = K;

    fn from_parts(key: Self::Key, score: u64) -> Self {
        Self::new(key, score)
    }

    fn key(&self) -> &Self::Key {
        &self.key
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
    }
}

/// Summary of a [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeReport {
    /// Number of batch entries that overwrote an existing score.
    pub updated: usize,
    /// Number of batch entries that added a new identity.
    pub inserted: usize,
    /// Number of entries dropped from the tail to respect capacity.
    pub evicted: usize,
}

/// Returns the number of occupied slots.
pub fn occupied<S: RankedSlot>(slots: &[S]) -> usize {
    slots.iter().filter(|slot| !slot.is_empty()).count()
}

/// Returns the occupied slots in rank order.
pub fn ranked<S: RankedSlot>(slots: &[S]) -> impl Iterator<Item = &S> {
    slots.iter().filter(|slot| !slot.is_empty())
}

/// Returns the slot at the given rank (1-indexed), if occupied.
pub fn at_rank<S: RankedSlot>(slots: &[S], rank: usize) -> Option<&S> {
    rank.checked_sub(1)
        .and_then(|idx| slots.get(idx))
        .filter(|slot| !slot.is_empty())
}

/// Returns whether the slots satisfy the board invariant: occupied slots
/// form a prefix sorted by score descending with unique identities, and
/// every empty slot has a zero score.
pub fn is_ranked<S: RankedSlot>(slots: &[S]) -> bool {
    let len = occupied(slots);
    let (head, tail) = slots.split_at(len);
    let prefix = head.iter().all(|slot| !slot.is_empty());
    let sorted = head.windows(2).all(|w| w[0].score() >= w[1].score());
    let unique = head
        .iter()
        .enumerate()
        .all(|(idx, slot)| head[..idx].iter().all(|other| other.key() != slot.key()));
    let cleared = tail.iter().all(|slot| slot.is_empty() && slot.score() == 0);
    prefix && sorted && unique && cleared
}

/// Merge a batch of score reports into the board.
///
/// Known identities get their score overwritten, unknown ones are added.
/// The occupied entries are then stably re-sorted by score descending and
/// the lowest-scoring tail is dropped if the board overflows. Identities
/// absent from the batch keep their score.
///
/// The batch is validated before the board is touched.
pub fn merge<S, I>(slots: &mut [S], batch: I) -> crate::Result<MergeReport>
where
    S: RankedSlot,
    I: IntoIterator<Item = (S::Key, u64)>,
{
    let batch = batch.into_iter().collect::<Vec<_>>();
    if batch.iter().any(|(key, _)| *key == S::Key::default()) {
        return Err(crate::Error::ReservedIdentity);
    }

    let mut staged = ranked(slots)
        .map(|slot| S::from_parts(slot.key().clone(), slot.score()))
        .collect::<Vec<_>>();
    let mut report = MergeReport::default();

    for (key, score) in batch {
        match staged.iter_mut().find(|slot| *slot.key() == key) {
            Some(existing) => {
                existing.set_score(score);
                report.updated += 1;
            }
            None => {
                staged.push(S::from_parts(key, score));
                report.inserted += 1;
            }
        }
    }

    // `sort_by` is stable: ties keep their previous relative order.
    staged.sort_by(|a, b| b.score().cmp(&a.score()));
    if staged.len() > slots.len() {
        report.evicted = staged.len() - slots.len();
        staged.truncate(slots.len());
    }

    let filled = staged.len();
    for (slot, entry) in slots.iter_mut().zip(staged) {
        *slot = entry;
    }
    reset(&mut slots[filled..]);

    Ok(report)
}

/// Reset every slot to the sentinel.
pub fn reset<S: RankedSlot>(slots: &mut [S]) {
    for slot in slots.iter_mut() {
        *slot = S::from_parts(S::Key::default(), 0);
    }
}
