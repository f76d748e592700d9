use std::{fmt::Display, num::NonZeroU32, str::FromStr};

use super::InventoryError;

/// Number of tags requested by one purchase, between 1 and [`Quantity::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// Largest purchase minted in one lot. Every tag of a lot is held in memory.
    pub const MAX: u32 = 10_000;

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Quantity {
    type Error = InventoryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .filter(|value| value.get() <= Self::MAX)
            .map(Self)
            .ok_or_else(|| InventoryError::InvalidQuantity(value.to_string()))
    }
}

impl FromStr for Quantity {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| InventoryError::InvalidQuantity(s.to_string()))?;
        Self::try_from(value)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(10_001)]
    #[case(4_000_000_000)]
    #[case(i64::MAX)]
    fn test_out_of_range_quantities_are_invalid(#[case] value: i64) {
        assert_eq!(
            Err(InventoryError::InvalidQuantity(value.to_string())),
            Quantity::try_from(value)
        );
    }

    #[rstest]
    #[case("2.5")]
    #[case("two")]
    #[case("")]
    #[case("-3")]
    fn test_non_integer_text_is_invalid(#[case] raw: &str) {
        assert_err!(raw.parse::<Quantity>());
    }

    #[rstest]
    fn test_largest_quantity_is_accepted() {
        let quantity = assert_ok!(Quantity::try_from(i64::from(Quantity::MAX)));
        assert_eq!(Quantity::MAX, quantity.get());
    }

    #[rstest]
    fn test_positive_quantity_parses() {
        let quantity = assert_ok!(" 3 ".parse::<Quantity>());
        assert_eq!(3, quantity.get());
    }
}
