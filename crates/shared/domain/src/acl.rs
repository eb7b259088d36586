//! Repository access-control lists attached to imported artifacts.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Permissions granted by a single access-control entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Permissions: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const DELETE = 1 << 2;
        const ACL_MANAGEMENT = 1 << 3;

        const ALL = Self::READ.bits()
            | Self::WRITE.bits()
            | Self::DELETE.bits()
            | Self::ACL_MANAGEMENT.bits();
    }
}

impl From<&str> for Permissions {
    fn from(s: &str) -> Self {
        match s {
            "read" => Self::READ,
            "write" => Self::WRITE,
            "delete" => Self::DELETE,
            "acl_management" => Self::ACL_MANAGEMENT,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}

/// The kind of principal an entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidKind {
    User,
    Role,
}

/// A single access-control entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ace {
    pub sid: String,
    pub kind: SidKind,
    pub permissions: Permissions,
}

/// Access-control list applied to a stored domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFileAcl {
    pub owner: String,
    pub owner_kind: SidKind,
    pub entries_inheriting: bool,
    pub aces: Vec<Ace>,
}

impl RepositoryFileAcl {
    /// Creates an inheriting ACL owned by a user.
    #[must_use]
    pub fn owned_by(owner: impl Into<String>) -> Self {
        Self { owner: owner.into(), owner_kind: SidKind::User, entries_inheriting: true, aces: Vec::new() }
    }

    /// Appends an entry and stops inheriting from the parent.
    #[must_use]
    pub fn grant(mut self, sid: impl Into<String>, kind: SidKind, permissions: Permissions) -> Self {
        self.entries_inheriting = false;
        self.aces.push(Ace { sid: sid.into(), kind, permissions });
        self
    }

    /// Effective permissions granted to `sid` by explicit entries.
    #[must_use]
    pub fn permissions_for(&self, sid: &str) -> Permissions {
        self.aces
            .iter()
            .filter(|ace| ace.sid == sid)
            .fold(Permissions::empty(), |acc, ace| acc | ace.permissions)
    }
}
