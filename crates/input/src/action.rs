/// Movement requested by the held keys for one frame.
///
/// Each axis is the sum of opposing unit contributions, so it is always one
/// of -1, 0 or 1. The kernel consumes intents, never raw key events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    /// +1 forward (`W`), -1 backward (`S`).
    pub walk: i8,
    /// +1 right (`D`), -1 left (`A`).
    pub strafe: i8,
}

impl MoveIntent {
    pub const IDLE: MoveIntent = MoveIntent { walk: 0, strafe: 0 };

    pub fn new(walk: i8, strafe: i8) -> Self {
        Self {
            walk: walk.clamp(-1, 1),
            strafe: strafe.clamp(-1, 1),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.walk != 0 || self.strafe != 0
    }

    /// Largest absolute axis value; scales the view bob.
    pub fn magnitude(&self) -> f32 {
        self.walk.unsigned_abs().max(self.strafe.unsigned_abs()) as f32
    }
}
