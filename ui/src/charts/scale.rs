//! Linear scales and tick generation for the glucose subplots.

/// Maps a continuous domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Round-numbered ticks inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = ordered(self.domain);
        let step = tick_step(start, stop, count);
        stepped(start, stop, step)
    }

    /// Ticks on whole-minute/hour boundaries for a time domain expressed in
    /// units of `unit_seconds` (1.0 for unix seconds, 60.0 for minutes).
    pub fn time_ticks(&self, count: usize, unit_seconds: f64) -> Vec<f64> {
        const STEPS: [f64; 12] = [
            60.0, 300.0, 900.0, 1_800.0, 3_600.0, 7_200.0, 10_800.0, 21_600.0, 43_200.0,
            86_400.0, 172_800.0, 604_800.0,
        ];
        let (start, stop) = ordered(self.domain);
        let span = stop - start;
        if !span.is_finite() || span <= 0.0 {
            return vec![start];
        }
        let wanted = count.max(1) as f64;
        let step = STEPS
            .iter()
            .map(|step| step / unit_seconds)
            .find(|step| span / step <= wanted)
            .unwrap_or_else(|| tick_step(start, stop, count));
        stepped(start, stop, step)
    }
}

/// Domain of `values`, widened when every value is identical.
/// `None` when `values` is empty or holds no finite number.
pub fn extent(values: impl IntoIterator<Item = f64>, pad_if_flat: f64) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo > hi {
        return None;
    }
    if lo == hi {
        return Some((lo - pad_if_flat, hi + pad_if_flat));
    }
    Some((lo, hi))
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count.max(1) as f64;
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

fn stepped(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(start.is_finite() && stop.is_finite()) || step <= 0.0 {
        return Vec::new();
    }
    let first = (start / step).ceil() as i64;
    let last = (stop / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_onto_inverted_range() {
        let y = LinearScale::new((0.0, 200.0), (150.0, 0.0));
        assert_eq!(y.map(0.0), 150.0);
        assert_eq!(y.map(200.0), 0.0);
        assert_eq!(y.map(100.0), 75.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_centre() {
        let x = LinearScale::new((5.0, 5.0), (0.0, 200.0));
        assert_eq!(x.map(5.0), 100.0);
    }

    #[test]
    fn ticks_land_on_round_numbers() {
        let y = LinearScale::new((0.0, 200.0), (150.0, 0.0));
        assert_eq!(y.ticks(5), vec![0.0, 50.0, 100.0, 150.0, 200.0]);

        let small = LinearScale::new((0.0, 1.0), (0.0, 10.0));
        assert_eq!(small.ticks(2), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn time_ticks_pick_a_clock_friendly_step() {
        let start = 1_581_580_800.0; // 08:00Z
        let x = LinearScale::new((start, start + 3.0 * 3600.0), (0.0, 200.0));
        let ticks = x.time_ticks(6, 1.0);
        assert_eq!(ticks.first().copied(), Some(start));
        assert_eq!(ticks[1] - ticks[0], 1_800.0);

        let minutes = LinearScale::new((0.0, 180.0), (0.0, 200.0));
        assert_eq!(
            minutes.time_ticks(6, 60.0),
            vec![0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0]
        );
    }

    #[test]
    fn extent_widens_flat_series_and_ignores_nan() {
        assert_eq!(extent([3.0, f64::NAN, 1.0], 1.0), Some((1.0, 3.0)));
        assert_eq!(extent([4.0, 4.0], 1.0), Some((3.0, 5.0)));
        assert_eq!(extent(Vec::new(), 1.0), None);
    }
}
