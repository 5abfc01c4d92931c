/// Raw input the rendering layer derives from platform pointer and wheel events.
///
/// Displacements are along-axis pixel offsets; orientation has already been
/// folded away by [`crate::slider::Axis`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Thumb or track drag moved by this many pixels since the last event.
    Drag(i32),
    /// Wheel or trackpad notch; only the sign is used.
    Step(i32),
    /// Click in the track, already converted with `Layout::click_displacement`.
    Click(i32),
    /// Pointer released after a drag or click.
    Release,
}
