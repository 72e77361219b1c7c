pub struct StatsHelper;

impl StatsHelper {
    pub fn total(counts: &[u64]) -> u64 {
        counts.iter().sum()
    }

    /// Percentage of `part` in `total`, zero when the total is zero.
    pub fn share_percent(part: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        part as f64 * 100.0 / total as f64
    }

    /// Index of the largest value; the earliest index wins ties.
    pub fn argmax(values: &[u64]) -> Option<usize> {
        values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, u64)>, (idx, &value)| match best {
                Some((_, current)) if current >= value => best,
                _ => Some((idx, value)),
            })
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_of_empty_total_is_zero() {
        assert_eq!(StatsHelper::share_percent(5, 0), 0.0);
        assert_eq!(StatsHelper::share_percent(1, 4), 25.0);
    }

    #[test]
    fn argmax_prefers_earliest_on_ties() {
        assert_eq!(StatsHelper::argmax(&[]), None);
        assert_eq!(StatsHelper::argmax(&[3, 7, 7, 1]), Some(1));
        assert_eq!(StatsHelper::total(&[3, 7, 7, 1]), 18);
    }
}
