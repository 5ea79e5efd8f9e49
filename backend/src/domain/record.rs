//! Contract shared by every record kept in a [`RecordStore`].
//!
//! A record splits into what the caller supplies (the draft), what the
//! server assigns (identity and timestamps), and what may change later (the
//! patch). The store owns identity and time; records only know how to put
//! the pieces together.
//!
//! [`RecordStore`]: crate::domain::RecordStore

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Server-generated identity of a stored record.
pub trait RecordId: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Produce a fresh random identity.
    fn generate() -> Self;
}

/// A record persisted in a collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identity type assigned by the store.
    type Id: RecordId;
    /// Validated caller input used to create a record.
    type Draft: Send + 'static;
    /// Validated caller input used to modify a record.
    type Patch: Send + 'static;

    /// Singular noun used in log lines and error messages.
    const KIND: &'static str;

    /// Merge server-assigned fields with a validated draft.
    fn assemble(id: Self::Id, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Identity of this record.
    fn id(&self) -> &Self::Id;

    /// Apply a validated patch. Records with an `updated_at` field set it to
    /// `now`; `created_at` is never touched.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// Define a UUID-backed identity newtype.
///
/// The generated type serialises as a hyphenated lower-case string and
/// implements [`RecordId`] with v4 generation.
macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl $crate::domain::RecordId for $name {
            fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(value: ::uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

pub(crate) use define_record_id;
