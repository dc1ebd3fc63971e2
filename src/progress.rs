use crate::models::AppData;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub consumed_ml: u64,
    pub goal_ml: u64,
    pub percent: f64,
    pub label: String,
    pub goal_label: String,
}

/// Share of the goal reached, clamped to 0..=100. No goal means 0%.
pub fn progress_percent(consumed: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (consumed as f64 * 100.0 / goal as f64).clamp(0.0, 100.0)
}

pub fn present(data: &AppData) -> ProgressView {
    ProgressView {
        consumed_ml: data.total_consumed,
        goal_ml: data.daily_goal,
        percent: progress_percent(data.total_consumed, data.daily_goal),
        label: format!("{} ml / {} ml", data.total_consumed, data.daily_goal),
        goal_label: format!("{} ml", data.daily_goal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_ratio_and_caps_at_full() {
        for goal in [1u64, 7, 250, 2000, 3333] {
            for consumed in [0u64, 1, 100, 999, 2000, 5000] {
                let expected = (consumed as f64 * 100.0 / goal as f64).min(100.0);
                assert_eq!(progress_percent(consumed, goal), expected, "{consumed}/{goal}");
            }
        }
    }

    #[test]
    fn no_goal_reads_zero_but_keeps_raw_label() {
        let data = AppData {
            total_consumed: 600,
            ..AppData::default()
        };
        let view = present(&data);
        assert_eq!(view.percent, 0.0);
        assert_eq!(view.label, "600 ml / 0 ml");
        assert_eq!(view.goal_label, "0 ml");
    }

    #[test]
    fn three_glasses_against_two_litres() {
        let mut data = AppData::with_goal(2000);
        for _ in 0..3 {
            data.total_consumed += 250;
        }
        let view = present(&data);
        assert_eq!(view.consumed_ml, 750);
        assert_eq!(view.label, "750 ml / 2000 ml");
        assert_eq!(view.percent, 37.5);
    }
}
