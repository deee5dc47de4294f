//! Macros for ergonomic state machine construction.

/// Declare a module of application event codes together with a catalog
/// naming them.
///
/// Application events must be positive; codes at or below zero belong to
/// the machine. A non-positive code fails at compile time.
///
/// # Example
///
/// ```
/// use cadence::event_codes;
///
/// event_codes! {
///     pub mod traffic {
///         START = 1,
///         STOP = 2,
///         TIMEOUT = 3,
///     }
/// }
///
/// assert_eq!(traffic::TIMEOUT.get(), 3);
/// let catalog = traffic::catalog();
/// assert_eq!(catalog.name(traffic::START), Some("START"));
/// assert_eq!(catalog.describe(traffic::STOP), "STOP : 2");
/// ```
#[macro_export]
macro_rules! event_codes {
    (
        $(#[$meta:meta])*
        $vis:vis mod $module:ident {
            $(
                $(#[$event_meta:meta])*
                $event:ident = $code:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[allow(dead_code)]
        $vis mod $module {
            $(
                $(#[$event_meta])*
                pub const $event: $crate::core::EventCode = {
                    assert!($code > 0, "application event codes must be positive");
                    $crate::core::EventCode::new($code)
                };
            )*

            /// Catalog naming the events declared here as well as the
            /// reserved ones.
            pub fn catalog() -> $crate::core::EventCatalog {
                $crate::core::EventCatalog::new()
                    $(.with($event, stringify!($event)))*
            }
        }
    };
}
