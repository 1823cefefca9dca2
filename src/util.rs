/// Checks that a numerical value is in the provided interval `[a,b]` and returns early
/// with an [`Error::OutOfInterval`](crate::error::Error::OutOfInterval) naming the
/// offending expression if not
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns `Err` with the message "invalid value for \`alpha\`: 2 is not in the interval \[0, 1\]".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::OutOfInterval {
                name: stringify!($var),
                value: $var as f64,
                min: $a as f64,
                max: $b as f64,
            });
        }
    };
}
