use std::fmt;

/// Index of the vendor mode code (e.g. "0011") in ImageType
pub const VENDOR_CODE_INDEX: usize = 3;

/// DICOM ImageType field as an ordered list of tokens
///
/// Ultrasound vendors pack acquisition evidence into fixed positions:
/// - index 2: "INVALID" marks an unusable image
/// - index 3: four-digit vendor mode code
/// - index 10: "I1" marks an excluded image
///
/// All positional reads are bounds-checked; a short field simply does not
/// match any rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageType {
    pub tokens: Vec<String>,
}

impl ImageType {
    /// Creates a new ImageType from raw tokens
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens: tokens.into_iter().map(|t| t.trim().to_string()).collect(),
        }
    }

    /// Returns the token at `index`, if present
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Checks whether the token at `index` equals `val`
    pub fn token_is(&self, index: usize, val: &str) -> bool {
        self.get(index) == Some(val)
    }

    /// Returns the vendor mode code at index 3
    pub fn vendor_code(&self) -> Option<&str> {
        self.get(VENDOR_CODE_INDEX)
    }

    /// Checks whether the vendor code is one of `codes`
    pub fn vendor_code_in(&self, codes: &[&str]) -> bool {
        self.vendor_code().is_some_and(|code| codes.contains(&code))
    }

    /// Returns a simple string representation
    ///
    /// Format: "token0|token1|...", empty tokens shown as ''
    pub fn simple_repr(&self) -> String {
        self.tokens
            .iter()
            .map(|t| if t.is_empty() { "''" } else { t.as_str() })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Checks if any token contains `val`, ignoring case
    pub fn contains(&self, val: &str) -> bool {
        let needle = val.to_uppercase();
        self.tokens.iter().any(|t| t.to_uppercase().contains(&needle))
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_repr())
    }
}

impl From<&[&str]> for ImageType {
    fn from(tokens: &[&str]) -> Self {
        Self::new(tokens.iter().map(|s| s.to_string()).collect())
    }
}
