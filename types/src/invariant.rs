//! Internal consistency checks.
//!
//! [`internal_invariant!`](crate::internal_invariant) guards conditions that
//! only a bug in this workspace (or a metadata service breaking its contract)
//! can violate. Checks run when `debug_assertions` is on or the
//! `internal-checks` feature is enabled; otherwise the condition is not even
//! evaluated.
//!
//! [`internal_invariant_failure!`](crate::internal_invariant_failure) marks a
//! state that must never be reached. It has no value to return, so it panics
//! whether or not checks are enabled.

use core::fmt;

/// Whether [`internal_invariant!`](crate::internal_invariant) evaluates its condition.
pub const CHECKS_ENABLED: bool = cfg!(any(debug_assertions, feature = "internal-checks"));

/// Checks an internal invariant, halting with `message` when it does not hold.
///
/// ```no_run
/// fieldpath_types::internal_invariant!(1 + 1 == 3, "arithmetic is broken");
/// ```
#[macro_export]
macro_rules! internal_invariant {
    ($cond:expr $(,)?) => {
        $crate::internal_invariant!($cond, "{}", ::core::stringify!($cond))
    };
    ($cond:expr, $($msg:tt)+) => {
        if $crate::invariant::CHECKS_ENABLED && !($cond) {
            $crate::invariant::violated(::core::format_args!($($msg)+))
        }
    };
}

/// Reports an unreachable internal state.
#[macro_export]
macro_rules! internal_invariant_failure {
    ($($msg:tt)+) => {
        $crate::invariant::violated(::core::format_args!($($msg)+))
    };
}

#[doc(hidden)]
#[cold]
#[inline(never)]
#[track_caller]
pub fn violated(message: fmt::Arguments<'_>) -> ! {
    panic!("internal invariant violated: {}", message)
}
