use std::fmt;

/// Read-only snapshot of the generation counters.
///
/// Owned by the carver instance and returned by value; there is no
/// process-wide state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenStats {
    /// Number of independent walks, i.e. DFS excursions ending in a dead end.
    pub paths_created: u64,
    /// Number of backtracking episodes entered.
    pub backtrack_events: u64,
    /// Total stack pops performed while backtracking.
    pub cells_backtracked: u64,
    /// Cells reached by a walk so far. Equals width * height once complete.
    pub cells_visited: u64,
    /// Fully-walled cells patched by the completeness sweep.
    pub isolated_repairs: u64,
}

impl GenStats {
    pub fn average_path_length(&self) -> f64 {
        if self.paths_created == 0 {
            0.0
        } else {
            self.cells_visited as f64 / self.paths_created as f64
        }
    }
}

impl fmt::Display for GenStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Paths created:            {}", self.paths_created)?;
        writeln!(f, "Total cells pathed:       {}", self.cells_visited)?;
        writeln!(f, "Average path length:      {:.2}", self.average_path_length())?;
        writeln!(f, "Backtracks performed:     {}", self.backtrack_events)?;
        writeln!(f, "Cells backtracked:        {}", self.cells_backtracked)?;
        write!(f, "Isolated cells repaired:  {}", self.isolated_repairs)
    }
}
