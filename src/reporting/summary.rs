use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const RULE_WIDTH: usize = 50;

/// Totals for a finished batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_time: Duration,
    pub output_dir: PathBuf,
}

impl BatchSummary {
    /// Successful jobs as a percentage, 0.0 when nothing ran
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        self.successful as f64 / self.processed as f64 * 100.0
    }

    /// Mean wall time per job in seconds, 0.0 when nothing ran
    pub fn average_secs(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        self.total_time.as_secs_f64() / self.processed as f64
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{}", rule)?;
        writeln!(f, "BATCH INFERENCE COMPLETED")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total combinations processed: {}", self.processed)?;
        writeln!(f, "Successful: {}", self.successful)?;
        writeln!(f, "Failed: {}", self.failed)?;
        writeln!(f, "Success rate: {:.1}%", self.success_rate())?;
        writeln!(f, "Total time: {:.1} minutes", self.total_time.as_secs_f64() / 60.0)?;
        writeln!(f, "Average time per combination: {:.1} seconds", self.average_secs())?;
        writeln!(f, "Output directory: {}", self.output_dir.display())?;
        write!(f, "{}", rule)
    }
}
