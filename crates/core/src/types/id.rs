//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_uuid_id!` macro to create type-safe ID wrappers that
//! prevent accidentally mixing IDs from different entity types.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng, TryRngCore};
use uuid::Uuid;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `Uuid` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `generate()`, `from_uuid()`, `as_uuid()`
/// - `Display` and `FromStr` using the hyphenated form
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use pagecraft_core::define_uuid_id;
/// define_uuid_id!(PageId);
/// define_uuid_id!(ThemeId);
///
/// let page_id = PageId::generate();
/// let theme_id = ThemeId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: PageId = theme_id;
/// ```
#[macro_export]
macro_rules! define_uuid_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a fresh random ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::random_uuid())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Ok(Self(::uuid::Uuid::parse_str(s)?))
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <::uuid::Uuid as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <::uuid::Uuid as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_uuid_id!(SectionId);
define_uuid_id!(MerchantId);
define_uuid_id!(TemplateId);
define_uuid_id!(SessionId);

static FALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a random v4 UUID without aborting on entropy failure.
///
/// `Uuid::new_v4` panics if the OS entropy source is unavailable. Editing
/// sessions must keep working in that situation, so this first asks the OS
/// for random bytes and falls back to a seeded generator when that fails.
/// The fallback draws every nibble independently, so the result is still a
/// well-formed v4 UUID rather than a patterned one.
#[must_use]
pub fn random_uuid() -> Uuid {
    let mut bytes = [0u8; 16];
    if OsRng.try_fill_bytes(&mut bytes).is_err() {
        bytes = fallback_bytes();
    }
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Random bytes from a time-and-counter seeded PRNG.
///
/// Each byte is assembled from two independently drawn nibbles. The counter
/// keeps concurrent callers from sharing a seed even when the clock reads
/// the same nanosecond.
fn fallback_bytes() -> [u8; 16] {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
    let seq = FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed);
    let seed = nanos
        ^ (u64::from(std::process::id()) << 32)
        ^ seq.wrapping_mul(0x9e37_79b9_7f4a_7c15);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = [0u8; 16];
    for byte in &mut bytes {
        let [hi, ..] = rng.next_u32().to_le_bytes();
        let [lo, ..] = rng.next_u32().to_le_bytes();
        *byte = ((hi & 0x0f) << 4) | (lo & 0x0f);
    }
    bytes
}
