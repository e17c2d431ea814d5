//! Bounded interface names.
//!
//! The kernel stores interface names in a fixed `IFNAMSIZ` byte buffer
//! (including the NUL terminator). [`InterfaceName`] holds at most
//! `IFNAMSIZ - 1` bytes, so copying it into an `ifreq` can never overrun
//! the request buffer. The bound is enforced once, at construction.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

/// Maximum number of name bytes (excluding the terminator).
pub const MAX_NAME_LEN: usize = IFNAMSIZ - 1;

/// A kernel interface name, bounded to [`MAX_NAME_LEN`] bytes.
///
/// [`InterfaceName::new`] truncates over-long input (on a UTF-8 character
/// boundary, and at the first NUL byte). [`InterfaceName::strict`] rejects
/// anything the kernel would refuse instead.
///
/// ```ignore
/// use ifctl::util::InterfaceName;
///
/// let name = InterfaceName::new("a-very-long-interface-name");
/// assert_eq!(name.as_str(), "a-very-long-int");
///
/// assert!(InterfaceName::strict("eth 0").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceName {
    buf: [u8; MAX_NAME_LEN],
    len: u8,
}

impl InterfaceName {
    /// Create a name, truncating it to fit the kernel buffer.
    pub fn new(name: &str) -> Self {
        let name = match name.find('\0') {
            Some(nul) => &name[..nul],
            None => name,
        };

        let mut end = name.len().min(MAX_NAME_LEN);
        while !name.is_char_boundary(end) {
            end -= 1;
        }

        let mut buf = [0u8; MAX_NAME_LEN];
        buf[..end].copy_from_slice(&name.as_bytes()[..end]);
        Self {
            buf,
            len: end as u8,
        }
    }

    /// Create a name, rejecting anything that would be truncated or that
    /// the kernel refuses as an interface name.
    pub fn strict(name: &str) -> Result<Self> {
        validate(name)?;
        Ok(Self::new(name))
    }

    /// Build a name from a NUL-terminated kernel buffer (e.g. `ifr_name`).
    pub fn from_c_name(raw: &[libc::c_char]) -> Self {
        let bytes: Vec<u8> = raw
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        Self::new(&String::from_utf8_lossy(&bytes))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        // Constructed from a &str and cut on a char boundary.
        std::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or_default()
    }

    /// The name bytes, without terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// Length of the name in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if the name is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the name into an `ifr_name`-style buffer, NUL padded.
    pub fn to_c_name(&self) -> [libc::c_char; IFNAMSIZ] {
        let mut out = [0 as libc::c_char; IFNAMSIZ];
        for (dst, &src) in out.iter_mut().zip(self.as_bytes()) {
            *dst = src as libc::c_char;
        }
        out
    }
}

impl fmt::Display for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for InterfaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceName({:?})", self.as_str())
    }
}

impl AsRef<str> for InterfaceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for InterfaceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for InterfaceName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<String> for InterfaceName {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl FromStr for InterfaceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::strict(s)
    }
}

impl PartialEq<str> for InterfaceName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for InterfaceName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for InterfaceName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for InterfaceName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::strict(&s).map_err(serde::de::Error::custom)
    }
}

/// Validate an interface name.
pub fn validate(name: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidInterfaceName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("empty name"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name too long (max 15 bytes)"));
    }

    if name.contains('/') || name.contains('\0') {
        return Err(invalid("name contains invalid characters"));
    }

    if name.chars().any(|c| c.is_whitespace()) {
        return Err(invalid("name contains whitespace"));
    }

    Ok(())
}
