use image::Rgb;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Ring fill colors: white, black, blue, red, yellow. The draw order is
/// permuted per image.
pub const HOTSPOT_PALETTE: [Rgb<u8>; 5] = [
    Rgb([255, 255, 255]),
    Rgb([0, 0, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 0, 0]),
    Rgb([255, 255, 0]),
];

/// Soft background tones for the polygon datasets: grays, light blues,
/// greens, creams, pinks.
pub const BACKGROUND_COLORS: [Rgb<u8>; 15] = [
    Rgb([200, 200, 200]),
    Rgb([220, 220, 220]),
    Rgb([240, 240, 240]),
    Rgb([173, 216, 230]),
    Rgb([135, 206, 250]),
    Rgb([176, 224, 230]),
    Rgb([144, 238, 144]),
    Rgb([152, 251, 152]),
    Rgb([60, 179, 113]),
    Rgb([255, 228, 196]),
    Rgb([255, 239, 213]),
    Rgb([250, 235, 215]),
    Rgb([255, 192, 203]),
    Rgb([255, 182, 193]),
    Rgb([221, 160, 221]),
];

/// Saturated foreground colors for the polygon shapes.
pub const SHAPE_COLORS: [Rgb<u8>; 12] = [
    Rgb([255, 0, 0]),
    Rgb([0, 0, 255]),
    Rgb([0, 128, 0]),
    Rgb([255, 165, 0]),
    Rgb([128, 0, 128]),
    Rgb([255, 20, 147]),
    Rgb([0, 0, 0]),
    Rgb([70, 130, 180]),
    Rgb([218, 165, 32]),
    Rgb([165, 42, 42]),
    Rgb([0, 200, 0]),
    Rgb([200, 0, 200]),
];

/// Per-image colors for the ring pipeline: an unconstrained random
/// background under a permutation of the fixed palette.
pub struct RingColors {
    pub background: Rgb<u8>,
    pub rings: [Rgb<u8>; 5],
}

impl RingColors {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let background = Rgb([rng.random(), rng.random(), rng.random()]);
        let mut rings = HOTSPOT_PALETTE;
        rings.shuffle(rng);
        Self { background, rings }
    }
}

/// Per-image colors for the polygon pipeline. The foreground is resampled
/// while it matches the background; the palettes are disjoint, so in
/// practice the first draw stands.
pub struct ShapeColors {
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
}

impl ShapeColors {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let background = *BACKGROUND_COLORS.choose(rng).unwrap();
        let mut foreground = *SHAPE_COLORS.choose(rng).unwrap();
        while foreground == background {
            foreground = *SHAPE_COLORS.choose(rng).unwrap();
        }
        Self {
            background,
            foreground,
        }
    }
}
