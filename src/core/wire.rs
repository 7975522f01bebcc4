use std::{fmt, ops::Deref};

/// Errors that can occur during wire operations
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Wire with the given ID was not issued by this storage
    #[error("Wire with id {0} not found")]
    WireNotFound(WireId),
    /// Wire already holds the opposite value
    #[error("Wire with id {wire} already initialized to {current}")]
    WireAlreadyInitialized { wire: WireId, current: bool },
}
pub type WireError = Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(pub usize);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for WireId {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Boolean value representation in storage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptionalBoolean {
    #[default]
    None,
    True,
    False,
}

impl From<bool> for OptionalBoolean {
    fn from(value: bool) -> Self {
        if value {
            OptionalBoolean::True
        } else {
            OptionalBoolean::False
        }
    }
}

impl From<OptionalBoolean> for Option<bool> {
    fn from(stored: OptionalBoolean) -> Self {
        match stored {
            OptionalBoolean::True => Some(true),
            OptionalBoolean::False => Some(false),
            OptionalBoolean::None => None,
        }
    }
}

/// Write-once value storage, indexed by `WireId`.
///
/// A wire starts out unknown and can be initialized exactly once. Writing the
/// value it already holds is a no-op, writing the opposite value is an error.
#[derive(Clone, Debug, Default)]
pub struct Wires {
    values: Vec<OptionalBoolean>,
}

impl Wires {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage for `len` wires, all of them unknown.
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![OptionalBoolean::None; len],
        }
    }

    pub fn issue(&mut self) -> WireId {
        let id = WireId(self.values.len());
        self.values.push(OptionalBoolean::None);
        id
    }

    pub fn get(&self, wire_id: WireId) -> Result<Option<bool>, WireError> {
        self.values
            .get(*wire_id)
            .map(|stored| Option::<bool>::from(*stored))
            .ok_or(WireError::WireNotFound(wire_id))
    }

    /// Returns `true` if the wire was unknown before this call.
    pub fn init(&mut self, wire_id: WireId, value: bool) -> Result<bool, WireError> {
        let slot = self
            .values
            .get_mut(*wire_id)
            .ok_or(WireError::WireNotFound(wire_id))?;

        match Option::<bool>::from(*slot) {
            None => {
                *slot = value.into();
                Ok(true)
            }
            Some(current) if current == value => Ok(false),
            Some(current) => Err(WireError::WireAlreadyInitialized {
                wire: wire_id,
                current,
            }),
        }
    }

    /// Forgets the value of a wire, making it writable again.
    pub fn reset(&mut self, wire_id: WireId) -> Result<(), WireError> {
        let slot = self
            .values
            .get_mut(*wire_id)
            .ok_or(WireError::WireNotFound(wire_id))?;
        *slot = OptionalBoolean::None;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| !matches!(v, OptionalBoolean::None))
            .count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = WireId> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v, OptionalBoolean::None))
            .map(|(index, _)| WireId(index))
    }
}
