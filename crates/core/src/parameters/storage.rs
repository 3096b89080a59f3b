//! Parameter store
//!
//! Flat name → value table the mixer, channel, gimbal and arming groups are
//! registered into and loaded from. Names follow the `GROUP_FIELD` /
//! `GROUPn_FIELD` convention and fit in [`PARAM_NAME_LEN`] bytes.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 256;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Left out of name listings and counts
        const HIDDEN = 0b00000001;
        /// Fixed at registration
        const READ_ONLY = 0b00000010;
    }
}

/// Stored parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    /// Value as an integer (floats truncate, booleans are 0/1)
    pub fn as_int(&self) -> i32 {
        match self {
            ParamValue::Bool(v) => *v as i32,
            ParamValue::Int(v) => *v,
            ParamValue::Float(v) => *v as i32,
        }
    }

    /// Value as a float
    pub fn as_float(&self) -> f32 {
        match self {
            ParamValue::Bool(v) => *v as i32 as f32,
            ParamValue::Int(v) => *v as f32,
            ParamValue::Float(v) => *v,
        }
    }
}

/// Parameter name as stored
pub type ParamName = String<PARAM_NAME_LEN>;

/// Build an indexed parameter name such as `SERVO3_MIN`
///
/// `index` is zero-based and printed one-based. Names longer than
/// `PARAM_NAME_LEN` are rejected.
pub fn indexed_name(
    prefix: &str,
    index: usize,
    suffix: &str,
) -> Result<ParamName, ParameterError> {
    use core::fmt::Write;

    let mut name = ParamName::new();
    write!(name, "{}{}_{}", prefix, index + 1, suffix).map_err(|_| ParameterError::NameTooLong)?;
    Ok(name)
}

fn key(name: &str) -> Result<ParamName, ParameterError> {
    let mut key = ParamName::new();
    key.push_str(name).map_err(|_| ParameterError::NameTooLong)?;
    Ok(key)
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: ParamValue,
    flags: ParamFlags,
}

/// Named actuation parameters
///
/// Values live in RAM; loading and saving them belongs to the storage
/// collaborator, which uses the dirty flag to know when to write back.
pub struct ParameterStore {
    entries: FnvIndexMap<ParamName, Entry, MAX_PARAMS>,
    dirty: bool,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Current value, `None` if unregistered
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = key(name).ok()?;
        self.entries.get(&key).map(|entry| &entry.value)
    }

    /// Overwrite a registered parameter
    ///
    /// # Errors
    ///
    /// - `Unknown` if the name was never registered
    /// - `ReadOnly` if the parameter carries `READ_ONLY`
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let entry = self
            .entries
            .get_mut(&key(name)?)
            .ok_or(ParameterError::Unknown)?;
        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        entry.value = value;
        self.dirty = true;
        Ok(())
    }

    /// Register a parameter with its default
    ///
    /// Registering an existing name keeps the current value.
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = key(name)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }
        self.entries
            .insert(
                key,
                Entry {
                    value: default_value,
                    flags,
                },
            )
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        key(name)
            .ok()
            .and_then(|key| self.entries.get(&key))
            .is_some_and(|entry| entry.flags.contains(ParamFlags::HIDDEN))
    }

    /// Names of visible parameters, in registration order
    pub fn iter_names(&self) -> impl Iterator<Item = &ParamName> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.flags.contains(ParamFlags::HIDDEN))
            .map(|(name, _)| name)
    }

    /// Visible parameter count
    pub fn count(&self) -> usize {
        self.iter_names().count()
    }

    /// Changed since the last `clear_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Registered parameters, hidden ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Integer value of a parameter, or `default` if missing
    pub fn int_or(&self, name: &str, default: i32) -> i32 {
        self.get(name).map_or(default, ParamValue::as_int)
    }

    /// Integer value saturated to the `i16` range, or `default` if missing
    ///
    /// Out-of-range values land on `i16::MIN` / `i16::MAX`, where the loader's
    /// range checks reject them instead of seeing a wrapped value.
    pub fn i16_or(&self, name: &str, default: i16) -> i16 {
        self.int_or(name, default as i32)
            .clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }

    /// Float value of a parameter, or `default` if missing
    pub fn float_or(&self, name: &str, default: f32) -> f32 {
        self.get(name).map_or(default, ParamValue::as_float)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
