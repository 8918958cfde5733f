//! Logging macros
//!
//! With the `defmt` feature enabled the macros forward to the matching
//! `defmt` macro, so the calling crate must depend on `defmt` too. Without
//! it they compile to nothing, while still type-checking their arguments.
//! Format strings are restricted to `{}` and `{:?}` so both paths accept
//! them.

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        ::defmt::debug!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        ::defmt::info!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        ::defmt::warn!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        ::defmt::error!($($arg)*);
    }};
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
