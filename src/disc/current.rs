use std::{fs::File, io::Read};

use serde::Deserialize;

use crate::error::AdiError;

/// Discharge current driving the capillary.
pub trait DrivingCurrent {
    /// Current in amperes at time `t_sec` seconds.
    fn current(&self, t_sec: f64) -> f64;
}

#[derive(Clone, Copy, Debug)]
pub struct ConstantCurrent {
    pub amperes: f64,
}
impl DrivingCurrent for ConstantCurrent {
    fn current(&self, _t_sec: f64) -> f64 {
        self.amperes
    }
}

#[derive(Deserialize)]
struct CurrentSample {
    time_s: f64,
    current_a: f64,
}

/// Measured current waveform, linearly interpolated and held constant
/// outside the sampled interval.
#[derive(Clone, Debug)]
pub struct CurrentTable {
    times: Vec<f64>,
    currents: Vec<f64>,
}
impl CurrentTable {
    /// Reads `time_s,current_a` records; times must increase strictly.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AdiError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut times = Vec::new();
        let mut currents = Vec::new();
        for record in csv_reader.deserialize::<CurrentSample>() {
            let sample = record?;
            if let Some(&last) = times.last() {
                if sample.time_s <= last {
                    return Err(AdiError::unsupported(format!(
                        "current table times must increase: {} after {}",
                        sample.time_s, last
                    )));
                }
            }
            times.push(sample.time_s);
            currents.push(sample.current_a);
        }
        if times.is_empty() {
            return Err(AdiError::unsupported("current table is empty"));
        }
        log::info!(
            "current table: {} samples over [{:.3e}, {:.3e}] s",
            times.len(),
            times[0],
            times[times.len() - 1]
        );
        Ok(Self { times, currents })
    }
    pub fn load(file_path: &str) -> Result<Self, AdiError> {
        Self::from_reader(File::open(file_path)?)
    }
}
impl DrivingCurrent for CurrentTable {
    fn current(&self, t_sec: f64) -> f64 {
        let n = self.times.len();
        if t_sec <= self.times[0] {
            return self.currents[0];
        }
        if t_sec >= self.times[n - 1] {
            return self.currents[n - 1];
        }
        let k = self.times.partition_point(|&t| t <= t_sec);
        let (t0, t1) = (self.times[k - 1], self.times[k]);
        let w = (t_sec - t0) / (t1 - t0);
        (1.0 - w) * self.currents[k - 1] + w * self.currents[k]
    }
}
