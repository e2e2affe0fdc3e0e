//! Saving and restoring the full table.
//!
//! A snapshot is the bincode encoding of the whole key to entry map, expired
//! entries included. Loading merges into the current table and never
//! overwrites a live entry.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::SystemTime;

use crate::entry::Entry;
use crate::error::{CacheError, CacheResult};
use crate::storage::Store;

impl<V: Serialize> Store<V> {
    /// Write every entry to `writer`.
    ///
    /// The table is encoded into memory first, so a value that fails to
    /// encode leaves the stream untouched. The shared lock is held until
    /// the write completes.
    pub fn save<W: Write>(&self, mut writer: W) -> CacheResult<()> {
        let table = self.table.read();

        let encoded = panic::catch_unwind(AssertUnwindSafe(|| bincode::serialize(&table.entries)));
        let buf = match encoded {
            Ok(Ok(buf)) => buf,
            Ok(Err(err)) => {
                log::warn!("failed to encode snapshot: {}", err);
                return Err(CacheError::Encoding(err.to_string()));
            }
            Err(payload) => {
                let reason = panic_message(payload);
                log::warn!("failed to encode snapshot: {}", reason);
                return Err(CacheError::Encoding(reason));
            }
        };

        writer.write_all(&buf)?;
        writer.flush()?;
        log::debug!(
            "saved snapshot of {} entries ({} bytes)",
            table.entries.len(),
            buf.len()
        );
        Ok(())
    }

    /// Save a snapshot to a file, creating or truncating it.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> CacheResult<()> {
        let mut file = File::create(path)?;
        self.save(&mut file)?;
        file.sync_all()?;
        Ok(())
    }
}

impl<V: DeserializeOwned> Store<V> {
    /// Read a snapshot from `reader` and merge it into the table.
    ///
    /// An incoming entry is kept only if the key is absent or its current
    /// entry has expired. Nothing is merged unless the whole snapshot
    /// decodes. Returns the number of entries merged.
    pub fn load<R: Read>(&self, reader: R) -> CacheResult<usize> {
        let incoming: IndexMap<String, Entry<V>> =
            bincode::deserialize_from(reader).map_err(|err| {
                log::warn!("failed to decode snapshot: {}", err);
                decode_error(err)
            })?;

        let now = SystemTime::now();
        let total = incoming.len();
        let mut merged = 0;

        let mut table = self.table.write();
        for (key, entry) in incoming {
            let replaceable = table
                .entries
                .get(&key)
                .map_or(true, |current| current.is_expired_at(now));

            if replaceable {
                table.entries.insert(key, entry);
                merged += 1;
            }
        }
        drop(table);

        self.stats.record_loads(merged as u64);
        log::debug!("loaded snapshot: merged {} of {} entries", merged, total);
        Ok(merged)
    }

    /// Load a snapshot from a file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> CacheResult<usize> {
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }
}

fn decode_error(err: bincode::Error) -> CacheError {
    match *err {
        bincode::ErrorKind::Io(err) => CacheError::Io(err),
        other => CacheError::Decoding(other.to_string()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "value serializer panicked".to_string()
    }
}
