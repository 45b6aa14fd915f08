//! Flat, ordered string-to-string store with typed accessors
//!
//! Everything that crosses the process boundary is first flattened into a
//! [`PropertyStore`]. Keys keep their insertion order so the persisted file is
//! deterministic and easy to diff.

pub mod text;

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::utils::StableName;

/// Suffix of the element-count key of an indexed list.
pub const LIST_SIZE_SUFFIX: &str = "size";
/// Suffix of the presence sentinel written for nullable values.
pub const PRESENT_SUFFIX: &str = "present";

/// Join a namespace and a field name into a flat key.
pub fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing mapping. Keys end up in the map's order.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let mut store = Self::new();
        for (key, value) in map {
            store.set_string(key, value)?;
        }
        Ok(store)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Remove a key, returning its value. Later keys keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Raw lookup that treats absence as a normal outcome.
    pub fn find(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    // ---- strings ----

    /// Set a value. Overwriting keeps the key's original position.
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        if !text::is_valid_key(key) {
            return Err(Error::encoding(key, "key must match [A-Za-z0-9_.]+"));
        }
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 = value.to_string(),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value.to_string()));
            }
        }
        Ok(())
    }

    pub fn get_string(&self, key: &str) -> Result<&str> {
        self.find(key).ok_or_else(|| Error::missing_key(key))
    }

    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.find(key).unwrap_or(default)
    }

    // ---- integers ----

    pub fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.set_string(key, &value.to_string())
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        let raw = self.get_string(key)?;
        raw.parse::<i64>()
            .map_err(|_| Error::malformed(key, raw, "an integer"))
    }

    /// Integer accessor restricted to the `u32` range.
    pub fn get_u32(&self, key: &str) -> Result<u32> {
        let raw = self.get_string(key)?;
        raw.parse::<u32>()
            .map_err(|_| Error::malformed(key, raw, "a non-negative 32-bit integer"))
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> Result<i64> {
        if self.contains_key(key) {
            self.get_int(key)
        } else {
            Ok(default)
        }
    }

    // ---- booleans ----

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.set_string(key, if value { "true" } else { "false" })
    }

    /// Only the exact strings `true` and `false` are accepted.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get_string(key)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(Error::malformed(key, other, "'true' or 'false'")),
        }
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        if self.contains_key(key) {
            self.get_bool(key)
        } else {
            Ok(default)
        }
    }

    // ---- lists ----

    /// Store a list as `prefix.size=n` followed by `prefix.0` .. `prefix.<n-1>`.
    /// Overwriting a longer list drops its trailing elements.
    pub fn set_string_list<S: AsRef<str>>(&mut self, prefix: &str, values: &[S]) -> Result<()> {
        let size_key = join_key(prefix, LIST_SIZE_SUFFIX);
        let old_size = self
            .find(&size_key)
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(0);
        for i in values.len()..old_size {
            self.remove(&join_key(prefix, &i.to_string()));
        }

        self.set_int(&size_key, values.len() as i64)?;
        for (i, value) in values.iter().enumerate() {
            self.set_string(&join_key(prefix, &i.to_string()), value.as_ref())?;
        }
        Ok(())
    }

    pub fn get_string_list(&self, prefix: &str) -> Result<Vec<String>> {
        let size = self.get_u32(&join_key(prefix, LIST_SIZE_SUFFIX))? as usize;
        (0..size)
            .map(|i| {
                self.get_string(&join_key(prefix, &i.to_string()))
                    .map(str::to_string)
            })
            .collect()
    }

    // ---- enums ----

    pub fn set_enum<E: StableName>(&mut self, key: &str, value: E) -> Result<()> {
        self.set_string(key, value.stable_name())
    }

    pub fn get_enum<E: StableName>(&self, key: &str) -> Result<E> {
        let raw = self.get_string(key)?;
        E::from_stable_name(raw).ok_or_else(|| {
            Error::malformed(
                key,
                raw,
                format!("a {} (one of: {})", E::KIND, E::expected_names()),
            )
        })
    }

    pub fn set_enum_list<E: StableName>(&mut self, prefix: &str, values: &[E]) -> Result<()> {
        let names: Vec<&str> = values.iter().map(StableName::stable_name).collect();
        self.set_string_list(prefix, &names)
    }

    pub fn get_enum_list<E: StableName>(&self, prefix: &str) -> Result<Vec<E>> {
        let size = self.get_u32(&join_key(prefix, LIST_SIZE_SUFFIX))? as usize;
        (0..size)
            .map(|i| self.get_enum(&join_key(prefix, &i.to_string())))
            .collect()
    }

    // ---- nullable values ----

    /// Store an optional value behind an explicit `key.present` sentinel.
    ///
    /// An absent value writes only the sentinel, so "explicitly null" is
    /// never confused with "key never written".
    pub fn set_nullable_string(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        self.set_bool(&join_key(key, PRESENT_SUFFIX), value.is_some())?;
        if let Some(value) = value {
            self.set_string(key, value)?;
        }
        Ok(())
    }

    /// Read a value written by [`set_nullable_string`](Self::set_nullable_string).
    ///
    /// A missing sentinel is a missing key, not an absent value.
    pub fn get_nullable_string(&self, key: &str) -> Result<Option<String>> {
        if self.get_bool(&join_key(key, PRESENT_SUFFIX))? {
            self.get_string(key).map(|value| Some(value.to_string()))
        } else {
            Ok(None)
        }
    }

    pub fn set_nullable_u32(&mut self, key: &str, value: Option<u32>) -> Result<()> {
        let rendered = value.map(|v| v.to_string());
        self.set_nullable_string(key, rendered.as_deref())
    }

    pub fn get_nullable_u32(&self, key: &str) -> Result<Option<u32>> {
        if self.get_bool(&join_key(key, PRESENT_SUFFIX))? {
            self.get_u32(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Whether a nullable group rooted at `key` was written as present.
    pub fn is_present(&self, key: &str) -> Result<bool> {
        self.get_bool(&join_key(key, PRESENT_SUFFIX))
    }

    pub fn set_present(&mut self, key: &str, present: bool) -> Result<()> {
        self.set_bool(&join_key(key, PRESENT_SUFFIX), present)
    }

    // ---- persistence ----

    /// Text form: one `key=value` line per entry, in insertion order.
    pub fn render(&self) -> String {
        text::render(self.iter())
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut store = Self::new();
        for (key, value) in text::parse(source)? {
            store.index.insert(key.clone(), store.entries.len());
            store.entries.push((key, value));
        }
        Ok(store)
    }

    pub fn store<W: Write>(&self, mut target: W) -> Result<()> {
        target.write_all(self.render().as_bytes())?;
        target.flush()?;
        Ok(())
    }

    pub fn load<R: Read>(mut source: R) -> Result<Self> {
        let mut contents = String::new();
        source.read_to_string(&mut contents).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                Error::Format {
                    line: 0,
                    reason: "content is not valid UTF-8".to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::parse(&contents)
    }
}
