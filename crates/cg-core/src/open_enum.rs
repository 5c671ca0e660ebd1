//! Macro for string-backed enums that keep unrecognised spellings.
//!
//! Context documents are authored by hand, so a misspelled `join_type` or
//! `severity` must survive parsing and be reported by the validator instead of
//! failing the whole document. Each generated enum deserializes from any
//! string, matching recognised spellings case-insensitively and parking
//! everything else in an `Unrecognized` variant.

/// Define an open string enum.
///
/// Generates:
/// - The enum with one unit variant per spelling plus `Unrecognized(String)`
/// - `Serialize`/`Deserialize` through `String`
/// - `RECOGNIZED`, `as_str()`, `is_recognized()`
/// - `From<String>`, `From<&str>`, `From<Self> for String`, `Display`
macro_rules! define_open_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $Name:ident {
            $( $(#[$vmeta:meta])* $Variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        $vis enum $Name {
            $( $(#[$vmeta])* $Variant, )+
            /// A value outside the recognised set, kept verbatim for reporting
            Unrecognized(String),
        }

        impl $Name {
            /// Every recognised spelling, in declaration order
            pub const RECOGNIZED: &'static [&'static str] = &[$($text),+];

            /// The canonical spelling, or the raw text for unrecognised values
            pub fn as_str(&self) -> &str {
                match self {
                    $( $Name::$Variant => $text, )+
                    $Name::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// Whether the value is one of the recognised spellings
            pub fn is_recognized(&self) -> bool {
                !matches!(self, $Name::Unrecognized(_))
            }
        }

        impl From<String> for $Name {
            fn from(raw: String) -> Self {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $( $text => $Name::$Variant, )+
                    _ => $Name::Unrecognized(raw),
                }
            }
        }

        impl From<&str> for $Name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$Name> for String {
            fn from(value: $Name) -> String {
                match value {
                    $Name::Unrecognized(raw) => raw,
                    other => other.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_open_enum;
