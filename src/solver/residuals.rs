use std::collections::BTreeMap;

/// Initial residual of one field at one time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualSample {
    pub time: f64,
    pub field: String,
    pub initial_residual: f64,
}

/// Follows solver output and collects residuals.
#[derive(Debug, Clone, Default)]
pub struct ResidualMonitor {
    time: f64,
    samples: Vec<ResidualSample>,
}

/// Number at the start of `text`, up to the first comma or space.
fn leading_number(text: &str) -> Option<f64> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .next()?
        .trim_end_matches('s')
        .parse()
        .ok()
}

impl ResidualMonitor {
    pub fn new() -> Self {
        ResidualMonitor::default()
    }

    /// Feed one line of solver output. Returns the residual it reported, if any.
    pub fn feed(&mut self, line: &str) -> Option<ResidualSample> {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Time = ") {
            if let Some(time) = leading_number(rest) {
                self.time = time;
            }
            return None;
        }
        let (_, rest) = line.split_once("Solving for ")?;
        let (field, rest) = rest.split_once(',')?;
        let (_, rest) = rest.split_once("Initial residual = ")?;
        let sample = ResidualSample{
            time: self.time,
            field: field.trim().to_string(),
            initial_residual: leading_number(rest)?,
        };
        self.samples.push(sample.clone());
        Some(sample)
    }

    /// Time of the latest `Time = ` line.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn samples(&self) -> &[ResidualSample] {
        &self.samples
    }

    /// Latest initial residual of every field.
    pub fn latest(&self) -> BTreeMap<String, f64> {
        self.samples.iter()
            .map(|sample| (sample.field.clone(), sample.initial_residual))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_solver_output() {
        let log = "\
Time = 1

smoothSolver:  Solving for Ux, Initial residual = 1, Final residual = 0.0123, No Iterations 2
GAMG:  Solving for p, Initial residual = 0.5, Final residual = 0.004, No Iterations 7
time step continuity errors : sum local = 0.1
Time = 2s

smoothSolver:  Solving for Ux, Initial residual = 0.25, Final residual = 0.002, No Iterations 2
DILUPBiCGStab:  Solving for k, Initial residual = 3.5e-05, Final residual = 1e-08, No Iterations 1
";
        let mut monitor = ResidualMonitor::new();
        let found = log.lines().filter_map(|line| monitor.feed(line)).count();
        assert_eq!(found, 4);
        assert_eq!(monitor.time(), 2.0);
        assert_eq!(monitor.samples()[1], ResidualSample{time: 1.0, field: "p".to_string(), initial_residual: 0.5});
        let latest = monitor.latest();
        assert_eq!(latest["Ux"], 0.25);
        assert_eq!(latest["k"], 3.5e-5);
        assert_eq!(latest["p"], 0.5);
    }
}
