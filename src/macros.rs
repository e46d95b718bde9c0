/// Generates a non-exhaustive enum whose variants map to AGI wire strings.
///
/// Used for the startup block's positional field names, the command
/// keywords, and the parenthesized annotations in reply data. Expands to the
/// enum itself, `as_str()`, `Display`, `AsRef<str>`, a case-insensitive
/// `FromStr`, and `ALL`: every variant in declaration order. For session
/// fields that order is the order the engine sends them, and the startup
/// reader indexes `ALL` by line number to route each value.
///
/// `error_type` names a tuple struct holding the rejected input, defined
/// next to the enum (see
/// [`ParseSessionFieldError`](crate::session::ParseSessionFieldError)).
///
/// ```ignore
/// define_wire_enum! {
///     error_type: ParseStartupFieldError,
///     /// First two startup fields.
///     pub enum StartupField {
///         Request => "agi_request",
///         Channel => "agi_channel",
///     }
/// }
/// assert_eq!(StartupField::ALL[1].as_str(), "agi_channel");
/// assert_eq!("AGI_REQUEST".parse(), Ok(StartupField::Request));
/// ```
macro_rules! define_wire_enum {
    (
        error_type: $Err:ident,
        $(#[$enum_meta:meta])*
        $vis:vis enum $Name:ident {
            $(
                $(#[$var_meta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        #[allow(missing_docs)]
        $vis enum $Name {
            $(
                $(#[$var_meta])*
                $variant,
            )+
        }

        impl $Name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$Name] = &[ $( $Name::$variant, )+ ];

            /// String sent or received on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $Name::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $Err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $Name::ALL
                    .iter()
                    .copied()
                    .find(|v| s.eq_ignore_ascii_case(v.as_str()))
                    .ok_or_else(|| $Err(s.to_string()))
            }
        }
    };
}
