//! Verbosity-gated stderr logging for the heat scheduler.
//!
//! `SchedulerOptions::verbosity` picks the level. Arguments are only
//! evaluated when the level is enabled.
//! - 0: SILENT
//! - 1: DECISIONS
//! - 2: HEATS
//! - 3: SEARCH

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_DECISIONS: u8 = 1;
pub const VERBOSITY_HEATS: u8 = 2;
pub const VERBOSITY_SEARCH: u8 = 3;

/// Log at DECISIONS level (verbosity >= 1).
///
/// Used for: algorithm selection, speed tier membership, regeneration cut
/// points.
#[macro_export]
macro_rules! log_decisions {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DECISIONS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at HEATS level (verbosity >= 2).
///
/// Used for: start of each pool, every composed heat with its lanes, heats
/// dropped for having fewer than two racers.
#[macro_export]
macro_rules! log_heats {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_HEATS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at SEARCH level (verbosity >= 3).
///
/// Used for: each improved lane assignment found by the backtracking search,
/// node budget exhaustion.
#[macro_export]
macro_rules! log_search {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SEARCH {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_disabled_levels_skip_formatting() {
        let formatted = Cell::new(0);
        let heat = || {
            formatted.set(formatted.get() + 1);
            7
        };

        log_decisions!(VERBOSITY_SILENT, "heat {}", heat());
        log_heats!(VERBOSITY_DECISIONS, "heat {}", heat());
        log_search!(VERBOSITY_HEATS, "heat {}", heat());
        assert_eq!(formatted.get(), 0);

        log_decisions!(VERBOSITY_SEARCH, "heat {}", heat());
        assert_eq!(formatted.get(), 1);
    }
}
