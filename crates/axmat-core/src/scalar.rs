//! The element type shared by every matrix in a build.
//!
//! `f64` by default; enabling the `f32` feature switches the whole build to
//! single precision. It is not selectable at runtime.

/// Matrix element type.
#[cfg(not(feature = "f32"))]
pub type Scalar = f64;

/// Matrix element type.
#[cfg(feature = "f32")]
pub type Scalar = f32;

/// Name of the configured scalar type.
#[cfg(not(feature = "f32"))]
pub const SCALAR_NAME: &str = "f64";

/// Name of the configured scalar type.
#[cfg(feature = "f32")]
pub const SCALAR_NAME: &str = "f32";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_name_matches_type() {
        assert_eq!(std::mem::size_of::<Scalar>() * 8, SCALAR_NAME[1..].parse::<usize>().unwrap());
    }
}
