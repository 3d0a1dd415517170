use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Crops the diagnosis prompt is tuned for.
///
/// The flows accept any non-empty crop text; this set is advisory and is what
/// the crop picker offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropType {
    Guava,
    Mango,
    Tomato,
    Cotton,
    Rice,
}

impl CropType {
    pub const ALL: [CropType; 5] = [
        CropType::Guava,
        CropType::Mango,
        CropType::Tomato,
        CropType::Cotton,
        CropType::Rice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Guava => "Guava",
            CropType::Mango => "Mango",
            CropType::Tomato => "Tomato",
            CropType::Cotton => "Cotton",
            CropType::Rice => "Rice",
        }
    }

    /// True when `crop` names one of the supported crops (case-insensitive).
    pub fn is_supported(crop: &str) -> bool {
        crop.parse::<CropType>().is_ok()
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownCrop(pub String);

impl FromStr for CropType {
    type Err = UnknownCrop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CropType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCrop(s.to_string()))
    }
}

/// Comma-separated list used inside prompts, e.g. "Guava, Mango, Tomato, Cotton, and Rice".
pub fn supported_crops_phrase() -> String {
    let names: Vec<&str> = CropType::ALL.iter().map(|c| c.as_str()).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, and {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}
