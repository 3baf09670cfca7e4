//! Logging facade with a compile-time off switch.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported from
//! here. Without it, the same names expand to nothing, so call sites cost
//! nothing at runtime.
//!
//! ```rust,ignore
//! #[cfg(feature = "tracing")]
//! use crate::trace::{debug, debug_span};
//!
//! #[cfg(feature = "tracing")]
//! let _span = debug_span!("complete", rules = self.len()).entered();
//! #[cfg(feature = "tracing")]
//! debug!(iterations, "rulebook_complete");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop {
    /// Stand-in span; entering it does nothing.
    pub struct Span;

    impl Span {
        pub fn none() -> Self {
            Span
        }

        pub fn entered(self) -> SpanGuard {
            SpanGuard
        }
    }

    pub struct SpanGuard;

    #[macro_export]
    macro_rules! trace {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($tt:tt)*) => {};
    }

    #[macro_export]
    macro_rules! debug_span {
        ($($tt:tt)*) => {
            $crate::trace::Span::none()
        };
    }

    pub use crate::{debug, debug_span, info, trace, warn};
}

#[cfg(not(feature = "tracing"))]
pub use noop::*;

/// Install a stderr subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "tracing")]
pub fn init_subscriber() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(not(feature = "tracing"))]
pub fn init_subscriber() {}

#[cfg(test)]
#[path = "tests/trace.rs"]
mod tests;
