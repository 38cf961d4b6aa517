//! Macro for implementing Display and FromStr for tag-style enums
//!
//! Eliminates boilerplate for enum/string conversions by providing a single
//! implementation of both Display and FromStr. Parsing is case-insensitive;
//! the string representation is the canonical lowercase tag stored in the
//! database and emitted over the API.
//!
//! # Example
//!
//! ```rust
//! use learnarc_domain::impl_domain_tag_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Email,
//!     Push,
//! }
//!
//! impl_domain_tag_conversions!(Channel {
//!     Email => "email",
//!     Push => "push",
//! });
//! ```

/// Implements Display and FromStr traits for tag-style enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string tags
#[macro_export]
macro_rules! impl_domain_tag_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
