use std::fmt;

/// Permission represents a bitmask of access a pusher holds on a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permission(u32);

impl Permission {
    pub const NONE: Permission = Permission(0);
    pub const READ: Permission = Permission(1 << 0); // 1
    pub const WRITE: Permission = Permission(1 << 1); // 2
    pub const MANAGE: Permission = Permission(1 << 2); // 4
    pub const ALL: Permission = Permission(Self::READ.0 | Self::WRITE.0 | Self::MANAGE.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if this permission bitmask contains every bit of `required`.
    #[must_use]
    pub const fn has(self, required: Permission) -> bool {
        self.0 & required.0 == required.0
    }

    /// Combines two permission bitmasks.
    #[must_use]
    pub const fn union(self, other: Permission) -> Permission {
        Permission(self.0 | other.0)
    }

    #[must_use]
    pub fn to_strings(self) -> Vec<&'static str> {
        let mut perms = Vec::new();
        if self.has(Self::READ) {
            perms.push("read");
        }
        if self.has(Self::WRITE) {
            perms.push("write");
        }
        if self.has(Self::MANAGE) {
            perms.push("manage");
        }
        perms
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "none");
        }
        write!(f, "{}", self.to_strings().join(", "))
    }
}
