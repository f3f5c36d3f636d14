use std::fmt;

pub use kurbo::Rect;

/// One of the four worksheet characters that get extracted and animated.
///
/// The discriminant is the column of the character in the occurrence table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// 我
    Wo = 0,
    /// 是
    Shi = 1,
    /// 很
    Hen = 2,
    /// 你
    Ni = 3,
}

/// Number of targets, and therefore columns in the occurrence table.
pub const TARGET_COUNT: usize = 4;

impl Target {
    /// All targets in table-column order.
    pub const ALL: [Target; TARGET_COUNT] = [Target::Wo, Target::Shi, Target::Hen, Target::Ni];

    /// Column index of this target in the occurrence table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase pinyin name, also the stem of every artifact written for this target.
    pub fn name(self) -> &'static str {
        match self {
            Target::Wo => "wo",
            Target::Shi => "shi",
            Target::Hen => "hen",
            Target::Ni => "ni",
        }
    }

    /// Look a target up by its pinyin name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid cell address: `col` counts cells rightwards from the page's left edge, `row` counts
/// cells upwards from its bottom edge (PDF user space).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct CellAddr {
    pub col: i32,
    pub row: i32,
}

impl CellAddr {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Straight RGB color with channels in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Pure red, where every progress gradient starts.
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    /// Web "green" (`#008000`), where every progress gradient ends.
    pub const GREEN: Rgb = Rgb::new(0.0, 128.0 / 255.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Component-wise linear interpolation; `t` is clamped to `0..=1`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
