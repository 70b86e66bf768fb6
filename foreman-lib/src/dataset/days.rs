use crate::dataset::ShiftId;

/// Shifts grouped into one working day.
pub const SHIFTS_PER_DAY: usize = 3;

/// A block of consecutive shifts treated as one working day.
///
/// The horizon is cut into windows of [`SHIFTS_PER_DAY`] shifts; when the number of shifts is not
/// a multiple of the window size, the trailing one or two shifts form a shorter final day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayWindow {
    index: usize,
    first_shift: usize,
    length: usize,
}

impl DayWindow {
    /// Position of the day in the horizon.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of shifts in the day.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The shifts of the day in chronological order.
    pub fn shifts(&self) -> impl Iterator<Item = ShiftId> {
        (self.first_shift..self.first_shift + self.length).map(ShiftId::new)
    }
}

pub(crate) fn day_windows(number_of_shifts: usize) -> impl Iterator<Item = DayWindow> {
    (0..number_of_shifts)
        .step_by(SHIFTS_PER_DAY)
        .enumerate()
        .map(move |(index, first_shift)| DayWindow {
            index,
            first_shift,
            length: SHIFTS_PER_DAY.min(number_of_shifts - first_shift),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_multiple_of_the_window_size_gives_full_days() {
        let lengths: Vec<_> = day_windows(6).map(|day| day.length()).collect();
        assert_eq!(lengths, vec![3, 3]);
    }

    #[test]
    fn trailing_shifts_form_a_shorter_final_day() {
        let lengths: Vec<_> = day_windows(7).map(|day| day.length()).collect();
        assert_eq!(lengths, vec![3, 3, 1]);
    }

    #[test]
    fn an_empty_horizon_has_no_days() {
        assert_eq!(day_windows(0).count(), 0);
    }

    #[test]
    fn a_day_iterates_its_own_shifts() {
        let second_day = day_windows(8).nth(1).unwrap();
        let shifts: Vec<_> = second_day.shifts().collect();
        assert_eq!(
            shifts,
            vec![ShiftId::new(3), ShiftId::new(4), ShiftId::new(5)]
        );
    }
}
