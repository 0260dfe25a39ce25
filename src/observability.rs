//! This module provides observability hooks for the relocation orchestrators.
//!
//! Index-driven row movement is opaque once it goes wrong: a misbuilt gather
//! map produces a table that is merely *subtly* incorrect. The `log_metric!`
//! macro gives the orchestrators a structured way to report what they decided
//! (rows moved, masks promoted, groups discovered) without paying for it in
//! release builds.
//!
//! It is a zero-cost abstraction: the `#[cfg(debug_assertions)]` attribute ensures
//! that the macro and all calls to it are completely compiled out of release builds,
//! imposing no performance penalty in production.

/// Logs a structured key-value metric string to stdout, only in debug builds.
///
/// # Example
/// ```
/// use pindah_table::log_metric;
/// let promoted = 2;
/// log_metric!("event"="scatter", "outcome"="ok", "masks_promoted"=&promoted);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            let output = format!("PINDAH_METRIC: {{ {} }}", parts.join(", "));
            println!("{}", output);
        }
    };
}
