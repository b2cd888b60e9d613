//! Builder-validated request options.
//!
//! Every service call takes an options struct generated by [`options!`]. The
//! struct is immutable and only obtainable through its builder, whose
//! `build()` rejects missing or empty required fields with a
//! [`ValidationError`]. Deserializing an options struct goes through the same
//! builder, so JSON input is held to the same rules.

use crate::error::ValidationError;

/// Decides whether a set value still counts as absent for a required field.
pub trait Presence {
    /// True when the value is set but empty.
    fn is_blank(&self) -> bool {
        false
    }
}

impl Presence for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Unwrap a required builder slot.
pub(crate) fn required<T: Presence>(
    value: Option<T>,
    field: &'static str,
) -> Result<T, ValidationError> {
    match value {
        None => Err(ValidationError::Missing { field }),
        Some(v) if v.is_blank() => Err(ValidationError::Empty { field }),
        Some(v) => Ok(v),
    }
}

/// Declare an options struct and its builder.
///
/// ```ignore
/// options! {
///     /// Options for `get_intent`.
///     GetIntentOptions => GetIntentOptionsBuilder {
///         required {
///             workspace_id: String,
///             intent: String,
///         }
///         optional {
///             export: bool,
///         }
///     }
/// }
/// ```
///
/// A field may be renamed on the wire with `field as "wire_name": Type`.
macro_rules! options {
    (
        $(#[$struct_meta:meta])*
        $name:ident => $builder:ident {
            required {
                $( $(#[$rmeta:meta])* $rfield:ident $(as $rwire:literal)? : $rty:ty ),* $(,)?
            }
            optional {
                $( $(#[$ometa:meta])* $ofield:ident $(as $owire:literal)? : $oty:ty ),* $(,)?
            }
        }
    ) => {
        $(#[$struct_meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        pub struct $name {
            $(
                $(#[serde(rename = $rwire)])?
                $rfield: $rty,
            )*
            $(
                $(#[serde(rename = $owire)])?
                #[serde(skip_serializing_if = "Option::is_none")]
                $ofield: Option<$oty>,
            )*
        }

        #[doc = concat!("Builder for [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
        #[serde(default)]
        pub struct $builder {
            $(
                $(#[serde(rename = $rwire)])?
                $rfield: Option<$rty>,
            )*
            $(
                $(#[serde(rename = $owire)])?
                $ofield: Option<$oty>,
            )*
        }

        impl $name {
            /// Start an empty builder.
            #[must_use]
            pub fn builder() -> $builder {
                $builder::default()
            }

            /// Builder pre-filled with this instance's fields.
            #[must_use]
            pub fn to_builder(&self) -> $builder {
                $builder {
                    $( $rfield: Some(self.$rfield.clone()), )*
                    $( $ofield: self.$ofield.clone(), )*
                }
            }

            $(
                $(#[$rmeta])*
                #[must_use]
                pub fn $rfield(&self) -> &$rty {
                    &self.$rfield
                }
            )*

            $(
                $(#[$ometa])*
                #[must_use]
                pub fn $ofield(&self) -> Option<&$oty> {
                    self.$ofield.as_ref()
                }
            )*
        }

        impl $builder {
            $(
                $(#[$rmeta])*
                #[must_use]
                pub fn $rfield(mut self, $rfield: impl Into<$rty>) -> Self {
                    self.$rfield = Some($rfield.into());
                    self
                }
            )*

            $(
                $(#[$ometa])*
                #[must_use]
                pub fn $ofield(mut self, $ofield: impl Into<$oty>) -> Self {
                    self.$ofield = Some($ofield.into());
                    self
                }
            )*

            /// Validate required fields and produce the options.
            pub fn build(self) -> Result<$name, $crate::error::ValidationError> {
                Ok($name {
                    $( $rfield: $crate::options::required(self.$rfield, stringify!($rfield))?, )*
                    $( $ofield: self.$ofield, )*
                })
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let builder = <$builder as serde::Deserialize>::deserialize(deserializer)?;
                builder.build().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use options;
