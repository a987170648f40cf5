use rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests.
///
/// # Example
/// ```
/// use seriesbench::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u128> for FixedRand {
///     fn rand(&self) -> u128 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&self) -> T;
}

/// A `RandSource` backed by the thread-local RNG (`rand::rng()`).
///
/// The type does not store the RNG; it reaches for the calling thread's
/// generator on every call, so it may be shared freely across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u128> for ThreadRandom {
    fn rand(&self) -> u128 {
        rng().random()
    }
}
