use std::fmt;

/// A single rating on the scale from 1 (worst) to 5 (best).
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn new<I: Into<u8>>(val: I) -> Self {
        let new = Self(val.into());
        debug_assert!(new.is_valid());
        new
    }

    /// Returns `None` if the value is outside of the rating scale.
    pub fn try_new(val: i64) -> Option<Self> {
        u8::try_from(val)
            .ok()
            .map(Self)
            .filter(|new| new.is_valid())
    }

    pub const fn min() -> Self {
        Self(1)
    }

    pub const fn max() -> Self {
        Self(5)
    }

    pub fn is_valid(self) -> bool {
        self >= Self::min() && self <= Self::max()
    }
}

impl From<RatingValue> for u8 {
    fn from(from: RatingValue) -> Self {
        from.0
    }
}

impl From<RatingValue> for f64 {
    fn from(from: RatingValue) -> Self {
        f64::from(from.0)
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The arithmetic mean of ratings, rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AvgRatingValue(f64);

impl AvgRatingValue {
    pub fn new(val: f64) -> Self {
        Self((val * 100.0).round() / 100.0)
    }

    pub const fn min() -> Self {
        Self(1.0)
    }

    pub const fn max() -> Self {
        Self(5.0)
    }

    pub fn clamp(self) -> Self {
        Self(self.0.max(Self::min().0).min(Self::max().0))
    }

    pub fn is_valid(self) -> bool {
        self >= Self::min() && self <= Self::max()
    }
}

impl From<AvgRatingValue> for f64 {
    fn from(from: AvgRatingValue) -> Self {
        from.0
    }
}

#[derive(Debug, Default, Clone)]
pub struct AvgRatingValueBuilder {
    acc: u64,
    cnt: u64,
}

impl AvgRatingValueBuilder {
    pub fn add(&mut self, val: RatingValue) {
        debug_assert!(val.is_valid());
        self.acc += u64::from(val.0);
        self.cnt += 1;
    }

    pub fn count(&self) -> u64 {
        self.cnt
    }

    /// Returns `None` if no ratings have been added.
    pub fn build(self) -> Option<AvgRatingValue> {
        if self.cnt > 0 {
            Some(AvgRatingValue::new(self.acc as f64 / self.cnt as f64).clamp())
        } else {
            None
        }
    }
}

impl std::ops::AddAssign<RatingValue> for AvgRatingValueBuilder {
    fn add_assign(&mut self, rhs: RatingValue) {
        self.add(rhs);
    }
}

impl FromIterator<RatingValue> for AvgRatingValueBuilder {
    fn from_iter<T: IntoIterator<Item = RatingValue>>(iter: T) -> Self {
        let mut builder = Self::default();
        for val in iter {
            builder += val;
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_value_range() {
        assert_eq!(None, RatingValue::try_new(0));
        assert_eq!(Some(RatingValue::new(1)), RatingValue::try_new(1));
        assert_eq!(Some(RatingValue::new(5)), RatingValue::try_new(5));
        assert_eq!(None, RatingValue::try_new(6));
        assert_eq!(None, RatingValue::try_new(-3));
        assert_eq!(None, RatingValue::try_new(256 + 3));
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let avg: AvgRatingValueBuilder = [4u8, 5, 5].into_iter().map(RatingValue::new).collect();
        assert_eq!(3, avg.count());
        assert_eq!(Some(4.67), avg.build().map(f64::from));

        let avg: AvgRatingValueBuilder = [1u8, 2].into_iter().map(RatingValue::new).collect();
        assert_eq!(Some(1.5), avg.build().map(f64::from));
    }

    #[test]
    fn average_of_nothing_is_unset() {
        assert_eq!(None, AvgRatingValueBuilder::default().build());
    }
}
