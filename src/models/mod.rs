//! Records mirrored from backend responses. The client owns none of their
//! invariants; they are typed projections of what the server sends.

/// Declare a backend vocabulary enum. Unknown wire values land in `Other`
/// instead of failing the whole response.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
            #[serde(other)]
            Other,
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other => "OTHER",
                }
            }

            /// Parse user input: case-insensitive, `-` accepted for `_`
            pub fn parse(s: &str) -> Option<Self> {
                let wire = s.trim().to_ascii_uppercase().replace('-', "_");
                $(
                    if wire == $wire {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            /// Accepted values, for usage messages
            pub fn choices() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join("|")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod auth;
pub mod booking;
pub mod court;
pub mod payment;
pub mod shop;
pub mod user;

pub use auth::{AuthPayload, Role, User};
