use std::path::Path;

use anyhow::Result;
use bincode::{
    config::{BigEndian, WithOtherEndian},
    DefaultOptions, Options,
};
use serde::{de::DeserializeOwned, Serialize};
use sled::Db as Sled;

/// Typed key/value access to a sled tree. Values are bincode encoded.
pub struct Db {
    handle: Sled,
    encoder: WithOtherEndian<DefaultOptions, BigEndian>,
}
impl Db {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let handle = sled::open(path)?;
        Ok(Self::with_handle(handle))
    }
    /// A store that lives in a scratch directory removed on drop.
    pub fn temporary() -> Result<Self> {
        let handle = sled::Config::new().temporary(true).open()?;
        Ok(Self::with_handle(handle))
    }
    fn with_handle(handle: Sled) -> Self {
        let encoder = bincode::options().with_big_endian();
        Self { handle, encoder }
    }

    // CRUD
    pub fn insert<T: Serialize, K: AsRef<str>>(&self, key: K, value: &T) -> Result<()> {
        let key = key.as_ref();
        let value = self.encoder.serialize(value)?;
        self.handle.insert(key, value)?;
        Ok(())
    }
    pub fn get<T: DeserializeOwned, K: AsRef<str>>(&self, key: K) -> Result<Option<T>> {
        let key = key.as_ref();
        let value = match self.handle.get(key)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let value = self.encoder.deserialize(&value)?;
        Ok(Some(value))
    }
    /// Atomically rewrites the value under `key`. Returns `None` when the key is absent.
    ///
    /// `f` may run more than once if another writer races on the same key.
    pub fn update<T, K, F>(&self, key: K, mut f: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        K: AsRef<str>,
        F: FnMut(T) -> T,
    {
        let key = key.as_ref();
        let encoder = self.encoder;
        let mut failure: Option<anyhow::Error> = None;
        let updated = self.handle.update_and_fetch(key, |current| {
            let bytes = current?;
            failure = None;
            let decoded: std::result::Result<T, _> = encoder.deserialize(bytes);
            let next = match decoded {
                Ok(value) => f(value),
                Err(err) => {
                    failure = Some(err.into());
                    return Some(bytes.to_vec());
                }
            };
            match encoder.serialize(&next) {
                Ok(encoded) => Some(encoded),
                Err(err) => {
                    failure = Some(err.into());
                    Some(bytes.to_vec())
                }
            }
        })?;
        if let Some(err) = failure {
            return Err(err);
        }
        match updated {
            Some(value) => Ok(Some(self.encoder.deserialize(&value)?)),
            None => Ok(None),
        }
    }
    /// Returns whether a value was present.
    pub fn remove<K: AsRef<str>>(&self, key: K) -> Result<bool> {
        let key = key.as_ref();
        let previous = self.handle.remove(key)?;
        Ok(previous.is_some())
    }

    // Iterators
    pub fn iter_prefix<'a, T: DeserializeOwned + 'a>(
        &'a self,
        prefix: &str,
    ) -> Result<impl Iterator<Item = Result<(String, T)>> + 'a> {
        let iter = self.handle.scan_prefix(prefix).map(move |item| {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec())?;
            let value = self.encoder.deserialize(&value)?;
            Ok((key, value))
        });
        Ok(iter)
    }
}

// Required Debug implementation for `Db`
impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish()
    }
}
