use serde::{Deserialize, Serialize};

/// Filing classification of a sole proprietor's return.
///
/// `BlueForm` (青色申告) is the preferential status that grants the flat
/// special deduction before any tax is computed. `WhiteForm` gets no deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilingType {
    #[default]
    #[serde(rename = "blue")]
    BlueForm,
    #[serde(rename = "white")]
    WhiteForm,
}

impl FilingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlueForm => "blue",
            Self::WhiteForm => "white",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blue" => Some(Self::BlueForm),
            "white" => Some(Self::WhiteForm),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BlueForm => "Blue form (preferential)",
            Self::WhiteForm => "White form",
        }
    }

    /// Whether the flat special deduction applies.
    pub fn is_preferential(&self) -> bool {
        matches!(self, Self::BlueForm)
    }
}

impl From<bool> for FilingType {
    fn from(preferential: bool) -> Self {
        if preferential {
            Self::BlueForm
        } else {
            Self::WhiteForm
        }
    }
}
