use crate::error::{PlotError, PlotResult};

/// Maps a data domain onto a pixel span.
///
/// The pixel span may be reversed (`start > end`), which is how y axes are
/// flipped so larger values sit higher on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> PlotResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(PlotError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64, pixel_start: f64, pixel_end: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        pixel_start + normalized * (pixel_end - pixel_start)
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64, pixel_start: f64, pixel_end: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = (pixel - pixel_start) / (pixel_end - pixel_start);
        self.domain_start + normalized * span
    }
}

/// Base-10 logarithmic scale used by `log_scale` y axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    inner: LinearScale,
}

impl LogScale {
    pub fn new(domain_start: f64, domain_end: f64) -> PlotResult<Self> {
        if domain_start <= 0.0 || domain_end <= 0.0 {
            return Err(PlotError::InvalidData(
                "log scale domain must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            inner: LinearScale::new(domain_start.log10(), domain_end.log10())?,
        })
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64, pixel_start: f64, pixel_end: f64) -> f64 {
        // Non-positive values collapse onto the lower edge.
        let (low, _) = self.inner.domain();
        let exponent = if value > 0.0 { value.log10() } else { low };
        self.inner.domain_to_pixel(exponent, pixel_start, pixel_end)
    }
}

/// Value axis scale chosen per axis view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Log(LogScale),
}

impl AxisScale {
    pub fn new(domain_start: f64, domain_end: f64, log: bool) -> PlotResult<Self> {
        if log {
            Ok(Self::Log(LogScale::new(domain_start, domain_end)?))
        } else {
            Ok(Self::Linear(LinearScale::new(domain_start, domain_end)?))
        }
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64, pixel_start: f64, pixel_end: f64) -> f64 {
        match self {
            Self::Linear(scale) => scale.domain_to_pixel(value, pixel_start, pixel_end),
            Self::Log(scale) => scale.domain_to_pixel(value, pixel_start, pixel_end),
        }
    }
}

/// `count` evenly spaced values from `start` to `end`, both inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// `count` values evenly spaced in log10 space from `start` to `end`.
#[must_use]
pub fn logspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    linspace(start.log10(), end.log10(), count)
        .into_iter()
        .map(|exponent| 10f64.powf(exponent))
        .collect()
}

/// Round tick values covering `[min, max]` with roughly `target` intervals,
/// using 1/2/5 x 10^k steps.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || target == 0 {
        return Vec::new();
    }

    let raw_step = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let residual = raw_step / magnitude;
    let step = if residual <= 1.0 {
        magnitude
    } else if residual <= 2.0 {
        2.0 * magnitude
    } else if residual <= 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, linspace, logspace, nice_ticks};

    #[test]
    fn reversed_pixel_span_flips_axis() {
        let scale = LinearScale::new(0.0, 10.0).expect("scale");
        assert_eq!(scale.domain_to_pixel(0.0, 400.0, 0.0), 400.0);
        assert_eq!(scale.domain_to_pixel(10.0, 400.0, 0.0), 0.0);
        assert_eq!(scale.pixel_to_domain(200.0, 400.0, 0.0), 5.0);
    }

    #[test]
    fn zero_width_domain_is_rejected() {
        assert!(LinearScale::new(1.0, 1.0).is_err());
        assert!(LinearScale::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn linspace_hits_both_ends() {
        assert_eq!(linspace(0.0, 6.0, 7), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn logspace_spans_decades() {
        let values = logspace(1.0, 1000.0, 4);
        assert_eq!(values.len(), 4);
        assert!((values[1] - 10.0).abs() < 1e-9);
        assert!((values[3] - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn nice_ticks_use_round_steps() {
        assert_eq!(nice_ticks(0.0, 3.5, 5), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(nice_ticks(1.0, 1.0, 5).is_empty());
    }
}
