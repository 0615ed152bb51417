/// A matrix keypad, reduced to the one operation the controller needs.
///
/// Implementations scan the hardware on demand; there is no buffering, so a
/// key only registers while it is held down during a poll.
pub trait Keypad {
    /// The set of key symbols currently pressed
    fn pressed(&mut self) -> Vec<char>;
}
