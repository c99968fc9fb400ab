// SPDX-License-Identifier: MIT

//! Runs the strategies one after another on the same array, timing each with
//! [`Instant`], and renders the console report.

use crate::config::{processors, BenchConfig};
use crate::data::Dataset;
use crate::error::Result;
use crate::pools::StandardPool;
use crate::strategies;
use log::{info, warn};
use std::fmt;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

/// Question asked before printing the array.
pub const PRINT_ALL_PROMPT: &str = concat!(
    "Do you want to print all vector values? ",
    "y:yes(values and average) / n:no(only average)"
);

/// Sum and elapsed time of one strategy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub label: String,
    pub sum: i64,
    pub elapsed: Duration,
}

impl Measurement {
    pub fn micros(&self) -> u128 {
        self.elapsed.as_micros()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total: {}, execution lapse: {} microseconds",
            self.label,
            self.sum,
            self.micros()
        )
    }
}

/// Everything a benchmark run produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub processors: usize,
    /// Chunk threads and pool workers actually used.
    pub threads: usize,
    pub array_length: usize,
    /// Time spent constructing the pool, reported apart from the trials.
    pub pool_creation: Duration,
    pub measurements: Vec<Measurement>,
}

impl Report {
    /// Sum produced by the last strategy run.
    pub fn total(&self) -> i64 {
        self.measurements.last().map_or(0, |m| m.sum)
    }

    /// Integer average of the array.
    pub fn average(&self) -> i64 {
        if self.array_length == 0 {
            return 0;
        }
        self.total() / self.array_length as i64
    }

    /// True when every strategy produced the same sum.
    pub fn is_consistent(&self) -> bool {
        self.measurements
            .windows(2)
            .all(|pair| pair[0].sum == pair[1].sum)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Number of processors (possible concurrent threads): {}, \
             threads used: {}",
            self.processors, self.threads
        )?;
        let mut measurements = self.measurements.iter();
        // Pool creation is printed right before the first pool trial.
        for measurement in measurements.by_ref().take(3) {
            writeln!(f, "{}", measurement)?;
        }
        writeln!(
            f,
            "Threadpool creation lapse: {} microseconds",
            self.pool_creation.as_micros()
        )?;
        for measurement in measurements {
            writeln!(f, "{}", measurement)?;
        }
        Ok(())
    }
}

/// Runs `f` and returns its value together with the elapsed time.
pub fn timed<T>(f: impl FnOnce() -> Result<T>) -> Result<(T, Duration)> {
    let start_time = Instant::now();
    let value = f()?;
    Ok((value, start_time.elapsed()))
}

fn measure(
    label: impl Into<String>,
    f: impl FnOnce() -> Result<i64>,
) -> Result<Measurement> {
    let (sum, elapsed) = timed(f)?;
    let measurement = Measurement {
        label: label.into(),
        sum,
        elapsed,
    };
    info!("{}", measurement);
    Ok(measurement)
}

/// Runs every strategy on `dataset` in a fixed order: single thread,
/// thread-per-chunk joined in order, thread-per-chunk with a locked
/// accumulator, then `config.pool_trials` trials on one pool.
pub fn run(config: &BenchConfig, dataset: &Dataset) -> Result<Report> {
    config.validate()?;
    let values = dataset.as_slice();
    let mut measurements = Vec::with_capacity(3 + config.pool_trials);

    measurements.push(measure("Single thread", || {
        Ok(strategies::single_thread(values))
    })?);
    measurements.push(measure("Multi thread(1)", || {
        strategies::future_per_chunk(values, config.threads)
    })?);
    measurements.push(measure("Multi thread(2)", || {
        strategies::thread_per_chunk(values, config.threads)
    })?);

    let (pool, pool_creation) = timed(|| StandardPool::new(config.threads))?;
    info!(
        "threadpool creation lapse: {} microseconds",
        pool_creation.as_micros()
    );

    let shared = dataset.shared();
    for trial in 0..config.pool_trials {
        measurements.push(measure(format!("Threadpool({})", trial + 3), || {
            strategies::pool_reduce(&pool, &shared, config.tasks)
        })?);
    }
    pool.join();

    let report = Report {
        processors: processors(),
        threads: config.threads,
        array_length: dataset.len(),
        pool_creation,
        measurements,
    };
    if !report.is_consistent() {
        warn!("strategies disagree on the array sum");
    }
    Ok(report)
}

/// Asks whether to print every array value, reading answers from `input`
/// until a `y` or `n` character arrives. Every other non-whitespace
/// character repeats the question. End of input answers no.
pub fn prompt_print_all<R, W>(input: &mut R, output: &mut W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", PRINT_ALL_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        for answer in line.chars().filter(|c| !c.is_whitespace()) {
            match answer {
                'y' => return Ok(true),
                'n' => return Ok(false),
                _ => {
                    writeln!(output, "{}", PRINT_ALL_PROMPT)?;
                    output.flush()?;
                }
            }
        }
    }
}

/// Writes `arr[N] = {v0,v1,...} | average: A`, eliding the values unless
/// `print_all` is set.
pub fn write_summary<W: Write>(
    output: &mut W,
    values: &[i32],
    print_all: bool,
    average: i64,
) -> Result<()> {
    write!(output, "arr[{}] = {{", values.len())?;
    if print_all {
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                write!(output, ",")?;
            }
            write!(output, "{}", value)?;
        }
    } else {
        write!(output, "...")?;
    }
    writeln!(output, "}} | average: {}", average)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn small_config() -> BenchConfig {
        BenchConfig {
            array_length: 10,
            threads: 3,
            tasks: 3,
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_run_on_known_array() {
        let dataset = Dataset::from_vec((0..10).collect()).unwrap();
        let report = run(&small_config(), &dataset).unwrap();

        assert_eq!(report.measurements.len(), 5);
        assert!(report.is_consistent());
        assert_eq!(report.total(), 45);
        assert_eq!(report.average(), 4);

        let labels: Vec<&str> =
            report.measurements.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Single thread",
                "Multi thread(1)",
                "Multi thread(2)",
                "Threadpool(3)",
                "Threadpool(4)",
            ]
        );
    }

    #[test]
    fn test_report_layout() {
        let dataset = Dataset::from_vec(vec![2; 8]).unwrap();
        let report = run(&small_config(), &dataset).unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Number of processors"));
        assert!(lines[0].ends_with("threads used: 3"));
        assert!(lines[1].starts_with("Single thread total: 16,"));
        assert!(lines[4].starts_with("Threadpool creation lapse:"));
        assert!(lines[6].starts_with("Threadpool(4) total: 16,"));
    }

    #[test]
    fn test_inconsistent_report() {
        let measurement = |sum| Measurement {
            label: "x".into(),
            sum,
            elapsed: Duration::ZERO,
        };
        let report = Report {
            processors: 1,
            threads: 1,
            array_length: 2,
            pool_creation: Duration::ZERO,
            measurements: vec![measurement(4), measurement(5)],
        };
        assert!(!report.is_consistent());
        assert_eq!(report.average(), 2);
    }

    #[test]
    fn test_prompt_skips_invalid_answers() {
        let mut input = Cursor::new("x\n\n  q y\n");
        let mut output = Vec::new();
        assert!(prompt_print_all(&mut input, &mut output).unwrap());

        let asked = String::from_utf8(output).unwrap();
        assert_eq!(asked.matches(PRINT_ALL_PROMPT).count(), 3);
    }

    #[test]
    fn test_prompt_no_and_eof() {
        let mut output = Vec::new();
        let mut answer_no = Cursor::new("n\n");
        assert!(!prompt_print_all(&mut answer_no, &mut output).unwrap());
        let mut closed = Cursor::new("");
        assert!(!prompt_print_all(&mut closed, &mut output).unwrap());
    }

    #[test]
    fn test_summary_formats() {
        let values: Vec<i32> = (0..10).collect();

        let mut output = Vec::new();
        write_summary(&mut output, &values, true, 4).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "arr[10] = {0,1,2,3,4,5,6,7,8,9} | average: 4\n"
        );

        let mut output = Vec::new();
        write_summary(&mut output, &values, false, 4).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "arr[10] = {...} | average: 4\n"
        );
    }
}
