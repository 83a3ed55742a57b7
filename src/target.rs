use rand::Rng;

/// Fixed palette the target box is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
}

impl BoxColor {
    pub const PALETTE: [BoxColor; 6] = [
        BoxColor::Black,
        BoxColor::Red,
        BoxColor::Green,
        BoxColor::Yellow,
        BoxColor::Blue,
        BoxColor::Purple,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::PALETTE[rng.random_range(0..Self::PALETTE.len())]
    }

    /// Name used in exported CSV rows.
    pub fn name(&self) -> &'static str {
        match self {
            BoxColor::Black => "black",
            BoxColor::Red => "red",
            BoxColor::Green => "green",
            BoxColor::Yellow => "yellow",
            BoxColor::Blue => "blue",
            BoxColor::Purple => "purple",
        }
    }

    pub fn rgba(&self) -> [u8; 4] {
        match self {
            BoxColor::Black => [0, 0, 0, 255],
            BoxColor::Red => [255, 0, 0, 255],
            BoxColor::Green => [0, 160, 0, 255],
            BoxColor::Yellow => [255, 210, 0, 255],
            BoxColor::Blue => [0, 0, 255, 255],
            BoxColor::Purple => [128, 0, 128, 255],
        }
    }
}

/// The clickable colored box shown during a round.
///
/// Positions are in physical pixels, anchored at the top-left corner.
#[derive(Debug, Clone)]
pub struct Target {
    pub color: BoxColor,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub spawned_ns: u64,
}

impl Target {
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}
