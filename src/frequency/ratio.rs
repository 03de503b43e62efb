// Man/woman ratio per year.
//
// Iteration is driven by the woman counter: years only the man counter has
// are ignored, and a year missing from the man counter reads as 0. When the
// woman value is 0 the man value is returned as-is instead of dividing.

use serde::{Deserialize, Serialize};

use super::counter::YearCounter;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRatio {
    pub year: i32,
    pub ratio: f64,
}

pub type RatioSeries = Vec<YearRatio>;

pub fn ratio_series(woman: &YearCounter, man: &YearCounter) -> RatioSeries {
    woman
        .iter()
        .map(|(year, woman_occ)| {
            let man_occ = man.get(year);
            let ratio = if woman_occ != 0.0 {
                (man_occ / woman_occ).round_ties_even()
            } else {
                man_occ
            };
            YearRatio { year, ratio }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(values: &[(i32, f64)]) -> YearCounter {
        let mut c = YearCounter::new();
        for &(y, v) in values {
            c.add(y, v);
        }
        c
    }

    #[test]
    fn rounds_half_to_even() {
        let woman = counter(&[(1, 2.0), (2, 2.0)]);
        let man = counter(&[(1, 5.0), (2, 7.0)]);
        let ratios: Vec<f64> = ratio_series(&woman, &man).iter().map(|r| r.ratio).collect();
        assert_eq!(ratios, vec![2.0, 4.0]);
    }

    #[test]
    fn zero_woman_returns_man_verbatim() {
        let woman = counter(&[(1, 0.0)]);
        let man = counter(&[(1, -3.75)]);
        assert_eq!(ratio_series(&woman, &man)[0].ratio, -3.75);
    }

    #[test]
    fn man_only_years_are_ignored() {
        let woman = counter(&[(2000, 1.0)]);
        let man = counter(&[(1999, 4.0), (2000, 3.0)]);
        let series = ratio_series(&woman, &man);
        assert_eq!(series, vec![YearRatio { year: 2000, ratio: 3.0 }]);
    }

    #[test]
    fn missing_man_year_reads_as_zero() {
        let woman = counter(&[(2000, 4.0)]);
        let series = ratio_series(&woman, &YearCounter::new());
        assert_eq!(series[0].ratio, 0.0);
    }
}
