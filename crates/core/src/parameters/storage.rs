//! Parameter Storage Types
//!
//! Provides the in-memory `ParameterStore` the node's persisted
//! configuration is loaded into. Persistence itself is out of scope here.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two, required by the index map)
pub const MAX_PARAMS: usize = 16;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is read-only (cannot be modified at runtime)
        const READ_ONLY = 0b00000001;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    fn same_type(&self, other: &ParamValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    value: ParamValue,
    flags: ParamFlags,
}

type ParamName = String<PARAM_NAME_LEN>;

fn param_name(name: &str) -> Result<ParamName, ParameterError> {
    let mut key = ParamName::new();
    key.push_str(name)
        .map_err(|_| ParameterError::InvalidConfig)?;
    Ok(key)
}

/// Parameter store for configuration management
pub struct ParameterStore {
    entries: FnvIndexMap<ParamName, ParamEntry, MAX_PARAMS>,
    /// Dirty flag (changes not yet persisted)
    dirty: bool,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = param_name(name).ok()?;
        self.entries.get(&key).map(|e| &e.value)
    }

    /// Set parameter value
    ///
    /// The parameter must be registered, writable, and keep its type.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = param_name(name)?;
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(ParameterError::InvalidConfig)?;

        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        if !entry.value.same_type(&value) {
            return Err(ParameterError::TypeMismatch);
        }

        entry.value = value;
        self.dirty = true;
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = param_name(name)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }

        self.entries
            .insert(
                key,
                ParamEntry {
                    value: default_value,
                    flags,
                },
            )
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Check if store has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear dirty flag (called after the store was persisted)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
