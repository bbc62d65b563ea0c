/// Create an [InputShape](crate::core::InputShape) from its dimensions.
///
/// Expands to a `Result`, since only 4 or 5 non-empty dimensions form a valid input shape.
#[macro_export]
macro_rules! input_shape {
    ($($dim:expr),* $(,)?) => {
        $crate::core::InputShape::from_dims(&[$($dim),*])
    };
}

/// Assert that an [OutputShape](crate::core::OutputShape) has the given dimensions.
#[macro_export]
macro_rules! assert_output_shape {
    ($shape:expr, [$($dim:expr),* $(,)?]) => {
        assert_eq!($shape.dims(), [$($dim),*]);
    };
}
