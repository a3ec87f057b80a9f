//! API Constants
//!
//! String enums returned by the API. Parsing is case-insensitive and never
//! fails: values the server adds later are kept verbatim.

/// Declare a string enum with canonical values and an `Other` passthrough.
macro_rules! arm_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value not known to this version
            Other(String),
        }

        impl $name {
            /// Canonical values, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $value, )+
                    $name::Other(value) => value,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                $(
                    if input.eq_ignore_ascii_case($value) {
                        return Ok($name::$variant);
                    }
                )+
                Ok($name::Other(input.to_string()))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                match raw.parse::<$name>() {
                    Ok(parsed) => Ok(parsed),
                    Err(never) => match never {},
                }
            }
        }
    };
}

pub(crate) use arm_enum;
