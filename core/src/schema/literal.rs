//! Enumerated literal fields: values fixed by the schema itself.

use std::fmt;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field whose only legal value is `VALUE`.
pub trait WireLiteral {
    const VALUE: &'static str;
}

/// Declare a unit type that serializes to one fixed string and rejects any other.
macro_rules! wire_literal {
    ($(#[$meta:meta])* $vis:vis struct $name:ident = $value:literal;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::schema::literal::WireLiteral for $name {
            const VALUE: &'static str = $value;
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str($value)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let found = <::std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                if found == $value {
                    Ok($name)
                } else {
                    Err(<D::Error as ::serde::de::Error>::invalid_value(
                        ::serde::de::Unexpected::Str(&found),
                        &$value,
                    ))
                }
            }
        }
    };
}

pub(crate) use wire_literal;

/// `APIVersion`; this client speaks version 2 only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ApiVersion;

impl ApiVersion {
    pub const VALUE: u64 = 2;
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::VALUE)
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(Self::VALUE)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let found = u64::deserialize(deserializer)?;
        if found == Self::VALUE {
            Ok(Self)
        } else {
            Err(de::Error::invalid_value(Unexpected::Unsigned(found), &"API version 2"))
        }
    }
}
