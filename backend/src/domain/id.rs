//! Identifier newtypes over BSON object ids.
//!
//! Every resource id in the domain is a wrapper around a store-level object
//! id, constructed either randomly (at creation time) or by validating the
//! 24-character hex form found in request paths.

/// Validation errors shared by all identifier newtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdValidationError {
    /// The identifier was missing or blank.
    Empty,
    /// The identifier is not a valid object id hex string.
    Invalid,
}

impl std::fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::Invalid => write!(f, "identifier must be a valid object id"),
        }
    }
}

impl std::error::Error for IdValidationError {}

macro_rules! define_object_id {
    (
        $(#[$outer:meta])*
        $name:ident
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(::mongodb::bson::oid::ObjectId);

        impl $name {
            /// Validate and construct an identifier from its hex form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, $crate::domain::id::IdValidationError> {
                let raw = id.as_ref();
                if raw.trim().is_empty() {
                    return Err($crate::domain::id::IdValidationError::Empty);
                }
                ::mongodb::bson::oid::ObjectId::parse_str(raw)
                    .map(Self)
                    .map_err(|_| $crate::domain::id::IdValidationError::Invalid)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(::mongodb::bson::oid::ObjectId::new())
            }

            /// Underlying BSON object id for store queries.
            pub fn to_object_id(self) -> ::mongodb::bson::oid::ObjectId {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl From<::mongodb::bson::oid::ObjectId> for $name {
            fn from(value: ::mongodb::bson::oid::ObjectId) -> Self {
                Self(value)
            }
        }
    };
}

pub(crate) use define_object_id;
