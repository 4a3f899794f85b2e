use std::collections::BTreeMap;

use log::trace;

use crate::model::{LoadBorder, LoadContribution, Moment};

/// Accumulated loads closer to zero than this are rounding residue of
/// fractional percentages and count as no load at all.
const ZERO_LOAD_EPSILON: f64 = 1e-9;

/// Collapse overlapping load contributions into the ordered list of moments
/// where the accumulated load changes.
///
/// Every contribution adds its magnitude at `start` and removes it at `end`.
/// Changes that happen at the same moment are summed first, so two tasks
/// starting on the same day produce one border, not a zero-width segment.
/// The result always opens with `(Beginning, 0)`; moments are strictly
/// increasing and each value is the load in effect until the next border.
/// Levels within rounding distance of zero are snapped to exactly `0.0`, so
/// every finite set of contributions ends on a zero border.
///
/// ```text
/// +50 @100, +50 @200, -50 @250, -50 @300
///   => (Beginning, 0) (100, 50) (200, 100) (250, 50) (300, 0)
/// ```
pub fn distribute(loads: &[LoadContribution]) -> Vec<LoadBorder> {
    let mut deltas: BTreeMap<Moment, f64> = BTreeMap::new();
    deltas.insert(Moment::Beginning, 0.0);

    // Zero loads have no visual effect.
    for load in loads.iter().filter(|l| l.magnitude() != 0.0) {
        *deltas.entry(Moment::At(load.start())).or_insert(0.0) += load.magnitude();
        *deltas.entry(Moment::At(load.end())).or_insert(0.0) -= load.magnitude();
    }

    let mut level = 0.0;
    let borders: Vec<LoadBorder> = deltas
        .into_iter()
        .map(|(moment, delta)| {
            level += delta;
            if level.abs() < ZERO_LOAD_EPSILON {
                level = 0.0;
            }
            LoadBorder::new(moment, level)
        })
        .collect();
    trace!("{} loads distributed into {} borders", loads.len(), borders.len());
    borders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::date_millis;
    use chrono::NaiveDate;

    fn load(start: i64, end: i64, magnitude: f64) -> LoadContribution {
        LoadContribution::new(start, end, magnitude, None)
            .unwrap_or_else(|e| panic!("bad test load: {e}"))
    }

    fn borders(expected: &[(Option<i64>, f64)]) -> Vec<LoadBorder> {
        expected
            .iter()
            .map(|&(ts, value)| {
                let moment = ts.map_or(Moment::Beginning, Moment::At);
                LoadBorder::new(moment, value)
            })
            .collect()
    }

    #[test]
    fn empty_input_is_just_the_baseline() {
        assert_eq!(distribute(&[]), borders(&[(None, 0.0)]));
    }

    #[test]
    fn zero_loads_are_ignored() {
        let day = |d: u32| {
            date_millis(NaiveDate::from_ymd_opt(2024, 9, d).unwrap_or_default())
        };
        let loads = [
            load(day(1), day(11), 0.0),
            load(day(5), day(6), 1.0),
            load(day(3), day(11), 0.0),
        ];
        assert_eq!(
            distribute(&loads),
            borders(&[(None, 0.0), (Some(day(5)), 1.0), (Some(day(6)), 0.0)])
        );
    }

    #[test]
    fn nested_intervals() {
        let loads = [
            load(15, 17, 4.0),
            load(1, 20, 1.0),
            load(2, 7, 2.0),
            load(3, 4, 3.0),
        ];
        assert_eq!(
            distribute(&loads),
            borders(&[
                (None, 0.0),
                (Some(1), 1.0),
                (Some(2), 3.0),
                (Some(3), 6.0),
                (Some(4), 3.0),
                (Some(7), 1.0),
                (Some(15), 5.0),
                (Some(17), 1.0),
                (Some(20), 0.0),
            ])
        );
    }

    #[test]
    fn matching_borders_are_summed() {
        let loads = [
            load(1, 20, 1.0),
            load(1, 3, 2.0),
            load(3, 10, 3.0),
            load(1, 20, 4.0),
        ];
        assert_eq!(
            distribute(&loads),
            borders(&[
                (None, 0.0),
                (Some(1), 7.0),
                (Some(3), 8.0),
                (Some(10), 5.0),
                (Some(20), 0.0),
            ])
        );
    }

    #[test]
    fn partial_overlap() {
        let loads = [load(1, 5, 50.0), load(3, 8, 70.0)];
        assert_eq!(
            distribute(&loads),
            borders(&[
                (None, 0.0),
                (Some(1), 50.0),
                (Some(3), 120.0),
                (Some(5), 70.0),
                (Some(8), 0.0),
            ])
        );
    }

    #[test]
    fn handover_at_shared_instant_keeps_one_border() {
        // One task ends exactly when the next begins.
        let loads = [load(1, 5, 50.0), load(5, 9, 80.0)];
        assert_eq!(
            distribute(&loads),
            borders(&[(None, 0.0), (Some(1), 50.0), (Some(5), 80.0), (Some(9), 0.0)])
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut loads = vec![
            load(15, 17, 4.0),
            load(1, 20, 1.0),
            load(2, 7, 2.0),
            load(3, 4, 3.0),
            load(4, 15, 6.0),
        ];
        let expected = distribute(&loads);
        loads.reverse();
        assert_eq!(distribute(&loads), expected);
        loads.rotate_left(2);
        assert_eq!(distribute(&loads), expected);
    }

    #[test]
    fn moments_strictly_increase_and_load_returns_to_zero() {
        let loads = [
            load(0, 10, 25.0),
            load(0, 10, 25.0),
            load(5, 5, 40.0),
            load(2, 12, -1.0),
            load(7, 30, 100.0),
        ];
        let result = distribute(&loads);
        assert!(result.windows(2).all(|w| w[0].moment < w[1].moment));
        assert_eq!(result.last().map(|b| b.value), Some(0.0));
    }

    #[test]
    fn fractional_loads_return_to_exact_zero() {
        let loads = [load(0, 10, 10.1), load(2, 12, 20.2), load(20, 30, 50.0)];
        let result = distribute(&loads);
        let values: Vec<(Moment, f64)> = result.iter().map(|b| (b.moment, b.value)).collect();
        assert_eq!(values.len(), 7);
        assert_eq!(values[4], (Moment::At(12), 0.0));
        assert_eq!(values.last(), Some(&(Moment::At(30), 0.0)));
        assert!((values[2].1 - 30.3).abs() < 1e-9);
    }

    #[test]
    fn many_fractional_loads_conserve_zero() {
        let loads: Vec<LoadContribution> = (0..100)
            .map(|i| load(i, i + 37, 0.1 * (i % 7 + 1) as f64 + 0.01))
            .collect();
        let result = distribute(&loads);
        assert_eq!(result.last().map(|b| b.value), Some(0.0));
        assert!(result.iter().all(|b| b.value == 0.0 || b.value.abs() >= 1e-9));
    }
}
