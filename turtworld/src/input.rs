/// Held-key state sampled once per tick.
///
/// Keyboard plumbing lives with the host; the core only asks what is held
/// right now. There is no buffering beyond that.
pub trait InputSource {
    fn left(&self) -> bool;
    fn right(&self) -> bool;
    fn jump(&self) -> bool;

    /// Horizontal axis in `{-1, 0, 1}`. Opposite keys cancel out.
    fn horizontal_axis(&self) -> f32 {
        let mut value = 0.0;
        if self.left() {
            value -= 1.0;
        }
        if self.right() {
            value += 1.0;
        }
        value
    }
}

/// Plain snapshot of the three buttons the game reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_left(mut self, held: bool) -> Self {
        self.left = held;
        self
    }

    #[must_use]
    pub fn with_right(mut self, held: bool) -> Self {
        self.right = held;
        self
    }

    #[must_use]
    pub fn with_jump(mut self, held: bool) -> Self {
        self.jump = held;
        self
    }
}

impl InputSource for InputState {
    fn left(&self) -> bool {
        self.left
    }

    fn right(&self) -> bool {
        self.right
    }

    fn jump(&self) -> bool {
        self.jump
    }
}
