use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use itertools::join;

/// The Luby restart sequence: 1, 1, 2, 1, 1, 2, 4, ...
pub fn luby(y: f64, mut x: u32) -> f64 {
    // Find the finite subsequence that contains index 'x',
    // and the size of that subsequence:
    let mut size = 1;
    let mut seq = 0;

    while size < x + 1 {
        seq += 1;
        size = 2 * size + 1;
    }

    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }

    y.powi(seq)
}

pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    PartialOrd::partial_cmp(&a, &b).unwrap_or(Ordering::Equal)
}

pub struct DisplaySlice<'a, T>(pub &'a [T])
where
    &'a T: Display;

impl<'a, T> Display for DisplaySlice<'a, T>
where
    &'a T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", join(self.0, ", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luby_prefix() {
        let prefix: Vec<usize> = (0..15).map(|i| luby(2.0, i) as usize).collect();
        assert_eq!(prefix, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
    }
}
