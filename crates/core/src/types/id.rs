//! Newtype IDs for type-safe cart references.
//!
//! Use the `define_id!` macro to create string ID wrappers that prevent
//! accidentally mixing a line item id with a backend variant id.

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, rejecting empty values
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `parse()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>` and `TryFrom<String>` implementations
///
/// # Example
///
/// ```rust
/// # use storecart_core::define_id;
/// define_id!(OrderRef);
/// define_id!(CouponRef);
///
/// let order = OrderRef::parse("order-1").unwrap();
/// let coupon = CouponRef::parse("order-1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: OrderRef = coupon;
/// # let _ = (order, coupon);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an ID, rejecting empty or whitespace-only input.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if the trimmed input is empty.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::types::id::IdError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

// Key of a cart line; in practice the backend product or variant GID.
define_id!(LineItemId);

// Opaque backend variant reference, e.g. `gid://shopify/ProductVariant/123`.
define_id!(VariantId);

impl VariantId {
    /// Returns the numeric variant id: the final `/`-delimited segment.
    ///
    /// Cart permalinks only accept the numeric form, so
    /// `gid://shopify/ProductVariant/42` yields `Some("42")`. A GID ending in
    /// a slash has no usable id and yields `None`.
    #[must_use]
    pub fn numeric_id(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|segment| !segment.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = LineItemId::parse("  sku-1 ").unwrap();
        assert_eq!(id.as_str(), "sku-1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(LineItemId::parse(""), Err(IdError::Empty));
        assert_eq!(LineItemId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_numeric_id_from_gid() {
        let variant = VariantId::parse("gid://shopify/ProductVariant/44012345").unwrap();
        assert_eq!(variant.numeric_id(), Some("44012345"));
    }

    #[test]
    fn test_numeric_id_plain_number() {
        let variant = VariantId::parse("987").unwrap();
        assert_eq!(variant.numeric_id(), Some("987"));
    }

    #[test]
    fn test_numeric_id_trailing_slash() {
        let variant = VariantId::parse("gid://shopify/ProductVariant/").unwrap();
        assert_eq!(variant.numeric_id(), None);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<LineItemId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_as_plain_string() {
        let id = LineItemId::parse("A").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A\"");
    }
}
