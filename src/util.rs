/// Numeric conversion helpers.
///
/// This module turns the `f64` numbers of the language into positions and
/// counts: indices into strings and lists (negative ones counted from the
/// end), split offsets and repetition counts. All functions return an
/// `Option`, which is `None` when the number cannot be used as asked.
pub mod num;
