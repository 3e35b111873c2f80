use log::{info, warn};

/// Observer for diagnostics emitted while converting games.
///
/// Components report through a borrowed `Reporter` instead of logging on
/// their own, so the caller decides where diagnostics go: the CLI forwards
/// them to `log`, tests usually discard them. All methods default to no-ops.
pub trait Reporter: Sync {
    /// A game that could not be replayed and was skipped.
    fn malformed_game(&self, _detail: &str) {}

    /// A game whose position chain is unusually short.
    fn short_game(&self, _positions: usize, _event: &str) {}

    /// A sampled node very close to the end of its game.
    fn shallow_sample(&self, _moves_left: usize, _y: i8, _event: &str) {}

    /// Output capacity grew to `capacity` rows.
    fn capacity_grown(&self, _capacity: usize) {}
}

/// Forwards every event to the `log` crate.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn malformed_game(&self, detail: &str) {
        warn!("Error reading game: {}", detail);
    }

    fn short_game(&self, positions: usize, event: &str) {
        info!("Short game ({} positions): {}", positions, event);
    }

    fn shallow_sample(&self, moves_left: usize, y: i8, event: &str) {
        info!("{} moves left, winner: {}, event: {}", moves_left, y, event);
    }

    fn capacity_grown(&self, capacity: usize) {
        info!("Resizing to {}", capacity);
    }
}

/// Discards every event.
pub struct Silent;

impl Reporter for Silent {}
