use std::{fmt, time::Duration};

use batchperf_error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// All statements submitted as one grouped execution
    Batched,
    /// Every statement submitted and awaited on its own
    Unbatched,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Batched, Mode::Unbatched];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Batched => "batched",
            Self::Unbatched => "unbatched",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock time of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub mode: Mode,
    pub elapsed: Duration,
}

impl Timing {
    pub fn new(mode: Mode, elapsed: Duration) -> Self {
        Self { mode, elapsed }
    }

    pub fn nanos(&self) -> u128 {
        self.elapsed.as_nanos()
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Executed {} statements in {} nanoseconds",
            self.mode,
            self.nanos()
        )
    }
}

/// Result of one mode, failed runs keep their error
#[derive(Debug)]
pub struct Outcome {
    pub mode: Mode,
    pub result: Result<Timing>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let timing = Timing::new(Mode::Batched, Duration::from_micros(1500));
        assert_eq!(
            &timing.to_string(),
            "Executed batched statements in 1500000 nanoseconds"
        );

        let timing = Timing::new(Mode::Unbatched, Duration::from_nanos(7));
        assert_eq!(
            &timing.to_string(),
            "Executed unbatched statements in 7 nanoseconds"
        );
    }
}
