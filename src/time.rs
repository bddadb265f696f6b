//! Definitions of time in arrangements.
//!
//! Most entities store their time as seconds with three decimals, while some newer parts of the tooling use integer milliseconds. Text round trips of floating point seconds drift by fractions of a millisecond, so two time codes are compared with [`time_equal`] instead of `==`.

/// Two times closer than this, in seconds, are considered equal.
pub const TIME_TOLERANCE: f32 = 0.0009;

/// Returns whether the two times in seconds are equal within [`TIME_TOLERANCE`].
#[must_use]
pub fn time_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < TIME_TOLERANCE
}

/// Converts seconds into integer milliseconds, rounding to the nearest one.
#[must_use]
pub fn sec_to_ms(seconds: f32) -> i32 {
    (f64::from(seconds) * 1000.0).round() as i32
}

/// Converts integer milliseconds into seconds.
#[must_use]
pub fn ms_to_sec(ms: i32) -> f32 {
    (f64::from(ms) / 1000.0) as f32
}

/// Formats milliseconds as `m:ss.mmm` for messages shown to a user.
#[must_use]
pub fn format_time_code(ms: i32) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    format!(
        "{sign}{}:{:02}.{:03}",
        ms / 60_000,
        (ms / 1000) % 60,
        ms % 1000
    )
}

/// An entity placed at a time in the arrangement.
pub trait HasTime {
    /// The time in seconds.
    fn time(&self) -> f32;
}

impl<T: HasTime> HasTime for &T {
    fn time(&self) -> f32 {
        (**self).time()
    }
}

/// Finds the index of the first item at `time`.
///
/// `items` must be sorted by time. The search gives up as soon as it passes `time`.
#[must_use]
pub fn find_index_by_time<T: HasTime>(items: &[T], time: f32) -> Option<usize> {
    for (index, item) in items.iter().enumerate() {
        if time_equal(item.time(), time) {
            return Some(index);
        }
        if item.time() > time {
            return None;
        }
    }
    None
}

/// Finds the first item at `time`. See [`find_index_by_time`].
#[must_use]
pub fn find_by_time<T: HasTime>(items: &[T], time: f32) -> Option<&T> {
    find_index_by_time(items, time).and_then(|index| items.get(index))
}

/// Returns whether there is an item at `time` in `items` sorted by time.
#[must_use]
pub fn contains_time<T: HasTime>(items: &[T], time: f32) -> bool {
    find_index_by_time(items, time).is_some()
}

/// Returns the index where an item at `time` is inserted to keep `items` sorted.
///
/// The index is placed after every item whose time is equal to or earlier than `time`.
#[must_use]
pub fn insertion_index<T: HasTime>(items: &[T], time: f32) -> usize {
    items.partition_point(|item| item.time() < time || time_equal(item.time(), time))
}

/// Inserts `item` into `items` sorted by time, after existing items with the same time.
pub fn insert_by_time<T: HasTime>(items: &mut Vec<T>, item: T) {
    let index = insertion_index(items, item.time());
    items.insert(index, item);
}

/// Sorts `items` by time, keeping the order of items at the same time.
pub fn sort_by_time<T: HasTime>(items: &mut [T]) {
    items.sort_by(|a, b| a.time().total_cmp(&b.time()));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct At(f32);

    impl HasTime for At {
        fn time(&self) -> f32 {
            self.0
        }
    }

    #[test]
    fn tolerance() {
        for t in [0.0, 1.5, 78.5, 301.123] {
            assert!(time_equal(t, t));
            assert!(time_equal(t, t + 0.0005));
            assert!(!time_equal(t, t + 0.002));
        }
    }

    #[test]
    fn conversions() {
        assert_eq!(sec_to_ms(78.5), 78500);
        assert_eq!(sec_to_ms(10.123), 10123);
        assert_eq!(ms_to_sec(1500), 1.5);
        assert_eq!(format_time_code(78500), "1:18.500");
        assert_eq!(format_time_code(5), "0:00.005");
    }

    #[test]
    fn find_stops_after_target() {
        let items = [At(1.0), At(2.0), At(2.0003), At(3.0)];
        assert_eq!(find_index_by_time(&items, 2.0004), Some(1));
        assert_eq!(find_index_by_time(&items, 2.5), None);
        assert_eq!(find_index_by_time(&items, 4.0), None);
    }

    #[test]
    fn insert_after_equal_times() {
        let mut items = vec![At(1.0), At(2.0), At(3.0)];
        assert_eq!(insertion_index(&items, 2.0), 2);
        assert_eq!(insertion_index(&items, 0.5), 0);
        insert_by_time(&mut items, At(3.5));
        assert_eq!(items.last().map(HasTime::time), Some(3.5));
    }
}
