/// One synthetic reading, timestamped in seconds since the run started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub acetone: f64,
    pub error: f64,
    pub co2: f64,
}

impl Sample {
    pub fn new(time: f64, acetone: f64, error: f64, co2: f64) -> Self {
        Self {
            time,
            acetone,
            error,
            co2,
        }
    }

    /// Table row: time to 2 dp, concentrations to 3 dp
    pub fn formatted(&self) -> [String; 4] {
        [
            format!("{:.2}", self.time),
            format!("{:.3}", self.acetone),
            format!("{:.3}", self.error),
            format!("{:.3}", self.co2),
        ]
    }

    pub fn acetone_point(&self) -> (f64, f64) {
        (self.time, self.acetone)
    }

    pub fn co2_point(&self) -> (f64, f64) {
        (self.time, self.co2)
    }
}

impl From<(f64, f64, f64, f64)> for Sample {
    fn from(v: (f64, f64, f64, f64)) -> Self {
        Sample::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_uses_fixed_precision() {
        let s = Sample::new(1.0049, 0.51234, 0.1, -0.0004);
        assert_eq!(s.formatted(), ["1.00", "0.512", "0.100", "-0.000"]);
    }

    #[test]
    fn points_share_the_time_axis() {
        let s: Sample = (2.5, 0.3, 0.1, 0.4).into();
        assert_eq!(s.acetone_point(), (2.5, 0.3));
        assert_eq!(s.co2_point(), (2.5, 0.4));
    }
}
