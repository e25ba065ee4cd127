/// Commands the navigator understands.
/// Input handlers translate key presses into these instead of touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move selection by n entries (negative = towards older entries)
    MoveBy(isize),
    /// Jump to the oldest loaded entry (never fetches)
    JumpToStart,
    /// Jump to the newest loaded entry (never fetches)
    JumpToEnd,
    /// Open a context view on the selected entry
    OpenContext,
    /// Close the context view (or leave the tool from the search view)
    Close,
    Quit,
    /// Log list area changed size (rows/columns available for entries)
    ViewportResized { width: u16, height: u16 },
}
