#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use water_app::{AggregationStore, Notifier};
use water_core::{ComplexityClass, UsageEntry, date_key};
use water_db::{DbError, KeyValueStore, MemoryStore};

/// Wraps a store and widens the read-modify-write window.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
        }
    }
}

impl KeyValueStore for SlowStore {
    fn get(&self, namespace: &str, key: &str) -> water_db::Result<Option<String>> {
        let value = self.inner.get(namespace, key)?;
        thread::sleep(self.delay);
        Ok(value)
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> water_db::Result<()> {
        thread::sleep(self.delay);
        self.inner.put(namespace, key, value)
    }

    fn delete(&self, namespace: &str, key: &str) -> water_db::Result<()> {
        self.inner.delete(namespace, key)
    }
}

/// Store whose reads and writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, namespace: &str, key: &str) -> water_db::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::LockPoisoned);
        }
        self.inner.get(namespace, key)
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> water_db::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::LockPoisoned);
        }
        self.inner.put(namespace, key, value)
    }

    fn delete(&self, namespace: &str, key: &str) -> water_db::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::LockPoisoned);
        }
        self.inner.delete(namespace, key)
    }
}

/// Store whose next read pauses after fetching its value until released.
#[derive(Default)]
pub struct GatedStore {
    inner: MemoryStore,
    gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl GatedStore {
    /// Arms the gate for the next `get`. The first receiver fires once that
    /// read has fetched its value; sending on the returned sender lets the
    /// read return.
    pub fn arm(&self) -> (Receiver<()>, Sender<()>) {
        let (fetched_tx, fetched_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock().expect("gate lock") = Some((fetched_tx, release_rx));
        (fetched_rx, release_tx)
    }
}

impl KeyValueStore for GatedStore {
    fn get(&self, namespace: &str, key: &str) -> water_db::Result<Option<String>> {
        let value = self.inner.get(namespace, key)?;
        let gate = self.gate.lock().expect("gate lock").take();
        if let Some((fetched, release)) = gate {
            fetched.send(()).expect("signal fetched");
            release.recv().expect("wait for release");
        }
        Ok(value)
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> water_db::Result<()> {
        self.inner.put(namespace, key, value)
    }

    fn delete(&self, namespace: &str, key: &str) -> water_db::Result<()> {
        self.inner.delete(namespace, key)
    }
}

pub fn memory_store() -> AggregationStore {
    store_with(Arc::new(MemoryStore::new()))
}

pub fn store_with(backend: Arc<dyn KeyValueStore>) -> AggregationStore {
    AggregationStore::new(backend, 1000, Notifier::new(64))
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn make_entry(date: NaiveDate, timestamp: i64, ml: f64) -> UsageEntry {
    UsageEntry {
        timestamp,
        length: 12,
        complexity: ComplexityClass::Simple,
        water_usage_ml: ml,
        date_key: date_key(date),
    }
}
