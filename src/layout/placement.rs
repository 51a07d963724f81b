use crate::config::LayoutConfig;
use crate::model::Dataset;

/// X coordinates of the five layout columns: left attributes, left
/// frequencies, shared attributes, right frequencies, right attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub column1: f32,
    pub column2: f32,
    pub column3: f32,
    pub column4: f32,
    pub column5: f32,
}

impl Columns {
    pub fn new(width: f32, radius: f32, config: &LayoutConfig) -> Self {
        let aw = config.attribute_width;
        let fp = config.frequency_padding;
        let column3 = width / 2.0 - aw / 2.0;
        let column2 = column3 - fp - radius;
        let column1 = column2 - radius - fp - aw;
        let column4 = column3 + aw + fp + radius;
        let column5 = column4 + radius + fp;
        Self {
            column1,
            column2,
            column3,
            column4,
            column5,
        }
    }

    /// Frequency and attribute column for the `idx`-th placed frequency.
    pub fn side(&self, idx: usize) -> (f32, f32) {
        if idx % 2 == 0 {
            (self.column2, self.column1)
        } else {
            (self.column4, self.column5)
        }
    }
}

/// Largest radius any placed frequency reaches over its whole time series.
/// Callers guarantee every interval list is non-empty.
pub fn max_radius<F>(dataset: &Dataset, frequencies: &[usize], normalize: &F) -> f32
where
    F: Fn(f32) -> f32,
{
    let mut radii = frequencies.iter().flat_map(|&idx| {
        dataset.subgraphs[idx]
            .frequency
            .intervals
            .iter()
            .map(|interval| normalize(interval.percentage))
    });
    let first = radii.next().unwrap_or(0.0);
    radii.fold(first, |acc, radius| if radius > acc { radius } else { acc })
}

/// Top of a stack of `count` attributes centered on `center_y`.
pub fn centered_stack_top(center_y: f32, count: usize, config: &LayoutConfig) -> f32 {
    center_y - config.stack_height(count) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, RawNode};
    use crate::normalize::normalize;

    #[test]
    fn columns_follow_radius_and_padding() {
        let config = LayoutConfig::default();
        let columns = Columns::new(1000.0, 40.0, &config);
        assert_eq!(columns.column3, 440.0);
        assert_eq!(columns.column2, 440.0 - 50.0 - 40.0);
        assert_eq!(columns.column1, 350.0 - 40.0 - 50.0 - 120.0);
        assert_eq!(columns.column4, 440.0 + 120.0 + 50.0 + 40.0);
        assert_eq!(columns.column5, 650.0 + 40.0 + 50.0);
        assert_eq!(columns.side(0), (columns.column2, columns.column1));
        assert_eq!(columns.side(3), (columns.column4, columns.column5));
    }

    #[test]
    fn radius_uses_every_interval() {
        let raw = vec![
            vec![
                RawNode::attribute("1", "A"),
                RawNode::frequency(
                    "f",
                    vec![Interval::new(84.9, None), Interval::new(39.2, None)],
                ),
            ],
            vec![
                RawNode::attribute("2", "B"),
                RawNode::frequency("g", vec![Interval::new(10.0, None)]),
            ],
        ];
        let dataset = normalize(&raw).unwrap();
        let quartic = |p: f32| p.powi(4) / 20.0;
        let radius = max_radius(&dataset, &[1, 0], &quartic);
        assert_eq!(radius, quartic(84.9));
        assert!(radius > quartic(39.2));
    }

    #[test]
    fn stack_is_centered_on_frequency() {
        let config = LayoutConfig::default();
        assert_eq!(centered_stack_top(100.0, 1, &config), 100.0 - 22.5);
        assert_eq!(centered_stack_top(100.0, 2, &config), 100.0 - 52.5);
    }
}
