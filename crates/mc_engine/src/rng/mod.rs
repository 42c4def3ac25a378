//! # Random Number Generation Infrastructure
//!
//! Random shocks for path simulation come from a [`NormalSource`]. The
//! production source is [`SimRng`], a seeded wrapper around `rand::StdRng`;
//! [`ShockReplay`] feeds a fixed shock sequence instead, which pins a path down
//! exactly.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: all generators are seeded and the seed is retained
//! - **Ownership**: no process-wide generator; each run holds its own stream
//! - **Static dispatch**: simulators are generic over the source
//!
//! ## Usage Example
//!
//! ```rust
//! use mc_engine::rng::{NormalSource, SimRng};
//!
//! let mut rng = SimRng::from_seed(12345);
//! let z = rng.next_normal();
//! assert!(z.is_finite());
//! ```

mod prng;

pub use prng::SimRng;

/// A stream of independent standard normal draws.
///
/// Path simulators pull exactly one draw per simulated day, in day order.
pub trait NormalSource {
    /// Returns the next standard normal draw.
    fn next_normal(&mut self) -> f64;
}

impl<S: NormalSource + ?Sized> NormalSource for &mut S {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}

/// Replays a caller-supplied shock sequence.
///
/// Draws past the end of the sequence yield `0.0` (no shock). The number of
/// such padded draws is reported by [`padded`](Self::padded), so callers can
/// detect a sequence shorter than the path they simulated.
///
/// # Examples
///
/// ```rust
/// use mc_engine::rng::{NormalSource, ShockReplay};
///
/// let mut shocks = ShockReplay::new([0.5, -1.0]);
/// assert_eq!(shocks.next_normal(), 0.5);
/// assert_eq!(shocks.next_normal(), -1.0);
/// assert_eq!(shocks.padded(), 0);
/// assert_eq!(shocks.next_normal(), 0.0);
/// assert_eq!(shocks.padded(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ShockReplay<I> {
    shocks: I,
    padded: usize,
}

impl<I: Iterator<Item = f64>> ShockReplay<I> {
    /// Creates a replay source over the given shocks.
    pub fn new<T>(shocks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            shocks: shocks.into_iter(),
            padded: 0,
        }
    }

    /// Number of draws served past the end of the sequence.
    #[inline]
    pub fn padded(&self) -> usize {
        self.padded
    }
}

impl<I: Iterator<Item = f64>> NormalSource for ShockReplay<I> {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        match self.shocks.next() {
            Some(z) => z,
            None => {
                self.padded += 1;
                0.0
            }
        }
    }
}
