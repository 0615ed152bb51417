/// A character display, addressed by line and column.
///
/// Both operations are fire-and-forget; the controller never reads the
/// display back.
pub trait Display {
    /// Shows `text` starting at the given 1-based line and column
    fn show(&mut self, text: &str, line: u8, column: u8);

    /// Clears the display
    fn clear(&mut self);
}

/// Display that discards everything, for headless machines and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn show(&mut self, _text: &str, _line: u8, _column: u8) {}

    fn clear(&mut self) {}
}
