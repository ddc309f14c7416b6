use std::collections::{btree_map::Entry, BTreeMap};

use crate::host::{Record, RecordKey, RecordStore, TimeSource, ValueTransfer};

/// An in-memory host.
///
/// Records are keyed by `(kind, admin)` and external accounts by identity.
/// The clock only moves when told to.
#[derive(Debug, Clone)]
pub struct MemoryHost<K> {
    records: BTreeMap<RecordKey<K>, Record<K>>,
    balances: BTreeMap<K, u64>,
    now: i64,
}

impl<K: Ord> MemoryHost<K> {
    /// Create an empty host whose clock reads `now`.
    pub fn new(now: i64) -> Self {
        Self {
            records: BTreeMap::new(),
            balances: BTreeMap::new(),
            now,
        }
    }

    /// Set the clock.
    pub fn set_now(&mut self, now: i64) {
        self.now = now;
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&mut self, seconds: i64) {
        self.now = self.now.saturating_add(seconds);
    }

    /// Mint `amount` into an external account and return its new balance.
    pub fn airdrop(&mut self, account: K, amount: u64) -> crate::Result<u64> {
        let balance = self.balances.entry(account).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(crate::Error::Computation("account balance overflow"))?;
        Ok(*balance)
    }

    /// Balances of every external account seen so far.
    pub fn balances(&self) -> impl Iterator<Item = (&K, u64)> {
        self.balances.iter().map(|(account, balance)| (account, *balance))
    }

    /// Number of live records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl<K: Ord + Clone> RecordStore<K> for MemoryHost<K> {
    fn create_record(&mut self, key: RecordKey<K>, record: Record<K>) -> crate::Result<()> {
        match self.records.entry(key) {
            Entry::Occupied(entry) => Err(crate::Error::AlreadyInitialized(entry.key().kind)),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    fn write_record(&mut self, key: &RecordKey<K>, record: Record<K>) -> crate::Result<()> {
        let slot = self
            .records
            .get_mut(key)
            .ok_or(crate::Error::NotInitialized(key.kind))?;
        *slot = record;
        Ok(())
    }

    fn destroy_record(&mut self, key: &RecordKey<K>) -> crate::Result<Record<K>> {
        self.records
            .remove(key)
            .ok_or(crate::Error::NotInitialized(key.kind))
    }

    fn fetch_record(&self, key: &RecordKey<K>) -> crate::Result<&Record<K>> {
        self.records
            .get(key)
            .ok_or(crate::Error::NotInitialized(key.kind))
    }
}

impl<K: Ord + Clone> ValueTransfer<K> for MemoryHost<K> {
    fn balance_of(&self, account: &K) -> u64 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn debit(&mut self, account: &K, amount: u64) -> crate::Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(crate::Error::InsufficientFunds {
                required: amount,
                available,
            });
        }
        self.balances.insert(account.clone(), available - amount);
        Ok(())
    }

    fn credit_all(&mut self, credits: &[(K, u64)]) -> crate::Result<()> {
        let mut staged = BTreeMap::<&K, u64>::new();
        for (account, amount) in credits {
            let current = match staged.get(account) {
                Some(balance) => *balance,
                None => self.balance_of(account),
            };
            let next = current
                .checked_add(*amount)
                .ok_or(crate::Error::Computation("account balance overflow"))?;
            staged.insert(account, next);
        }
        for (account, balance) in staged {
            self.balances.insert(account.clone(), balance);
        }
        Ok(())
    }
}

impl<K> TimeSource for MemoryHost<K> {
    fn now(&self) -> i64 {
        self.now
    }
}
