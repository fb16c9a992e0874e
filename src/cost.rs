/*!
# Link Costs

Every [`Link`](crate::link::Link) carries a cost of a type implementing [`Cost`].
Algorithms that accumulate costs along paths (`Mark`/`Remark` traversals, all-pairs shortest
paths) only rely on this small interface:

- an additive identity [`Cost::zero`],
- accumulation of two costs [`Cost::accumulate`],
- equality and an order (`PartialEq + PartialOrd`). Costs are expected to be totally ordered
  in practice; incomparable values (such as `NaN`) are never considered an improvement.

The unit type `()` and `bool` implement [`Cost`] so that unweighted graphs can still be
traversed with every strategy. For flow networks, see [`Pipe`](crate::algo::Pipe).

# Precondition
Shortest-path strategies assume non-negative costs. This is **not** checked.
*/

use num::Zero;

/// Interface for link costs.
pub trait Cost: Clone + PartialEq + PartialOrd {
    /// The additive identity, i.e. the cost of an empty path
    fn zero() -> Self;

    /// Returns the cost of walking `self` followed by `other`
    fn accumulate(&self, other: &Self) -> Self;

    /// Returns *true* if `self` is strictly cheaper than `other`
    #[inline]
    fn is_cheaper_than(&self, other: &Self) -> bool {
        self < other
    }
}

impl Cost for () {
    fn zero() -> Self {}

    fn accumulate(&self, _: &Self) -> Self {}
}

impl Cost for bool {
    fn zero() -> Self {
        false
    }

    fn accumulate(&self, other: &Self) -> Self {
        *self | *other
    }
}

macro_rules! impl_numeric_cost {
    ($($t:ty),*) => {
        $(
            impl Cost for $t {
                #[inline]
                fn zero() -> Self {
                    <$t as Zero>::zero()
                }

                #[inline]
                fn accumulate(&self, other: &Self) -> Self {
                    *self + *other
                }
            }
        )*
    };
}

impl_numeric_cost!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
