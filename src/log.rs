//! Logging macros.
//!
//! Routed to `defmt` on embedded targets (feature `defmt`), printed from host
//! unit tests, and compiled out otherwise. Format strings must stay within the
//! subset understood by both `defmt` and `core::fmt` (`{}` and `{:?}`).

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std", test))]
        std::println!("[DEBUG] {}", format_args!($($arg)*));
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std", test))]
        std::println!("[WARN] {}", format_args!($($arg)*));
    }};
}

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "std", test))]
        std::eprintln!("[ERROR] {}", format_args!($($arg)*));
    }};
}

pub(crate) use {log_debug, log_error, log_trace, log_warn};
