//! Macros for building an API.

/// Define an API: one request enum plus one struct per request.
///
/// Every request struct implements [`Request`](trait.Request.html) with its
/// response type and converts into the enum. The caller has to import
/// `serde::{Deserialize, Serialize}`.
///
/// # Example
/// ```
/// use balise::{define_api, Request};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Pong;
///
/// define_api! {
///     mod ping_message;
///     pub enum PingAPIRequest {
///         Add(usize, usize) => usize,
///         Ping => Pong,
///     }
/// }
///
/// fn response_of<R: Request<PingAPIRequest>>(_: &R) {}
///
/// fn main() {
///     let request: PingAPIRequest = ping_message::Add(1, 2).into();
///     assert!(matches!(request, PingAPIRequest::Add(ping_message::Add(1, 2))));
///     response_of(&ping_message::Ping);
/// }
/// ```
#[macro_export]
macro_rules! define_api {
    (
        $(#[$modmeta:meta])*
        mod $message_module_name:ident;

        $(#[$outer:meta])*
        $vis:vis enum $enum_name:ident {
            $(
                $(#[$inner:meta])*
                $request_name:ident $(( $($field:ty),* ))? => $response:ty,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        $vis enum $enum_name {
            $(
                $(#[$inner])*
                $request_name($message_module_name::$request_name),
            )*
        }

        $(#[$modmeta])*
        $vis mod $message_module_name {
            use super::*;

            $(
                $(#[$inner])*
                #[derive(Debug, Clone, Serialize, Deserialize)]
                pub struct $request_name $(( $(pub $field),* ))?;

                impl $crate::Request<$enum_name> for $request_name {
                    type Response = $response;
                }

                impl From<$request_name> for $enum_name {
                    fn from(v: $request_name) -> Self {
                        Self::$request_name(v)
                    }
                }
            )*
        }
    };
}
