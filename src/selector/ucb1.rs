use crate::error::Result;

use super::{Selector, ucb_select};

/// UCB1 over each arm's full score history.
///
/// # Examples
///
/// ```
/// use tunebandit::selector::{Selector, Ucb1};
///
/// let a = [0.9, 0.8];
/// let b = [0.5];
/// // b has a lower mean but a larger exploration bonus
/// assert_eq!(Ucb1.select(&[("a", &a[..]), ("b", &b[..])]).unwrap(), "b");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Ucb1;

impl Selector for Ucb1 {
    fn select<'a>(&self, arms: &[(&'a str, &[f64])]) -> Result<&'a str> {
        ucb_select(arms, <[f64]>::to_vec)
    }
}
