use crate::alphabet::{Frequency, ToneAlphabet};
use crate::config::ToneConfig;
use crate::error::Result;

/// A maximal stretch of consecutive same-bucket samples, summarized as the
/// observed frequency plus how long the bucket was held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub frequency: Frequency,
    pub duration: f64,
}

/// Collapses a finished recording of per-tick dominant-frequency readings
/// into runs. Batch only: the host records first, then hands over the whole
/// sample list with the wall time it covered.
pub struct RunLengthAggregator {
    alphabet: ToneAlphabet,
}

impl RunLengthAggregator {
    pub fn new(config: ToneConfig) -> Result<Self> {
        Ok(Self {
            alphabet: ToneAlphabet::new(config)?,
        })
    }

    /// Aggregate samples taken over `elapsed_secs` of wall time.
    ///
    /// Run durations are derived from the effective sample rate
    /// (`samples / elapsed`), so host tick jitter cancels out as long as
    /// the cadence is roughly uniform.
    pub fn aggregate(&self, samples: &[Frequency], elapsed_secs: f64) -> Vec<Run> {
        if samples.is_empty() || elapsed_secs <= 0.0 {
            return Vec::new();
        }
        let sample_rate = samples.len() as f64 / elapsed_secs;

        let mut runs = Vec::new();
        let mut current = samples[0];
        let mut count = 1usize;
        for &sample in &samples[1..] {
            if self.alphabet.same_bucket(current, sample) {
                count += 1;
            } else {
                runs.push(Run {
                    frequency: current,
                    duration: count as f64 / sample_rate,
                });
                current = sample;
                count = 1;
            }
        }
        runs.push(Run {
            frequency: current,
            duration: count as f64 / sample_rate,
        });
        runs
    }
}
