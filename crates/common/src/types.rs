use serde::{Deserialize, Serialize};

/// Whether an account is controlled by a person or by a program.
///
/// Program accounts may buy tickets and deposit value, but cannot be named
/// as event organizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    #[default]
    Person,
    Program,
}

/// Authenticated caller identity.
///
/// The execution environment vouches for both the address and its kind; the
/// ledger only ever compares identities for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId {
    address: String,
    #[serde(default)]
    kind: AccountKind,
}

impl AccountId {
    /// Creates a person-controlled account identity.
    pub fn person(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            kind: AccountKind::Person,
        }
    }

    /// Creates a program-controlled account identity.
    pub fn program(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            kind: AccountKind::Program,
        }
    }

    /// Returns the account address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the account kind.
    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Returns true if the account is controlled by a program.
    pub fn is_program(&self) -> bool {
        self.kind == AccountKind::Program
    }

    /// Returns true if the address is blank.
    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The "not found" sentinel.
            pub const NONE: Self = Self(0);

            /// Creates an id from a raw value.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the id that follows this one.
            pub fn next(&self) -> Self {
                Self(self.0 + 1)
            }

            /// Returns true for the "not found" sentinel.
            pub fn is_none(&self) -> bool {
                self.0 == 0
            }

            /// Returns the raw id value.
            pub fn as_u64(&self) -> u64 {
                self.0
            }

            /// Returns the zero-based slot of this id in a dense registry.
            pub fn slot(&self) -> Option<usize> {
                self.0.checked_sub(1).and_then(|slot| usize::try_from(slot).ok())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

sequential_id! {
    /// Identifier of a ticketed event. Ids start at 1; 0 means "not found".
    EventId
}

sequential_id! {
    /// Identifier of a ticket purchase. Ids start at 1; 0 means "not found".
    PurchaseId
}
