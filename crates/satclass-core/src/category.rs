//! Image category dispatch by filename tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification rule selected for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    TrueColor,
    FalseColor,
    Ndvi,
    MoistureIndex,
    Ndwi,
    Highlight,
    /// No tag matched: plain per-channel histogram, no classification.
    Generic,
}

/// Tags in match priority; the first tag found in an identifier wins.
///
/// NDVI leads because its analysis replaces any other tag's result.
pub const TAG_PRIORITY: [(&str, Category); 6] = [
    ("NDVI", Category::Ndvi),
    ("False_color", Category::FalseColor),
    ("Moisture_index", Category::MoistureIndex),
    ("NDWI", Category::Ndwi),
    ("True_color", Category::TrueColor),
    ("Highlight", Category::Highlight),
];

impl Category {
    /// Case-sensitive, ordered substring match against `identifier`.
    pub fn from_identifier(identifier: &str) -> Self {
        TAG_PRIORITY
            .iter()
            .find(|(tag, _)| identifier.contains(tag))
            .map(|&(_, category)| category)
            .unwrap_or(Category::Generic)
    }

    /// Filename tag of this category, `None` for `Generic`.
    pub fn tag(self) -> Option<&'static str> {
        TAG_PRIORITY
            .iter()
            .find(|&&(_, c)| c == self)
            .map(|&(tag, _)| tag)
    }

    pub const ALL: [Category; 7] = [
        Category::TrueColor,
        Category::FalseColor,
        Category::Ndvi,
        Category::MoistureIndex,
        Category::Ndwi,
        Category::Highlight,
        Category::Generic,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::TrueColor => "true-color",
            Category::FalseColor => "false-color",
            Category::Ndvi => "ndvi",
            Category::MoistureIndex => "moisture-index",
            Category::Ndwi => "ndwi",
            Category::Highlight => "highlight",
            Category::Generic => "generic",
        };
        f.write_str(label)
    }
}

/// Map an image identifier (usually its file name) to a category.
pub fn classify(identifier: &str) -> Category {
    Category::from_identifier(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_tag_maps_to_its_category() {
        assert_eq!(classify("2024-05-01_True_color.jpg"), Category::TrueColor);
        assert_eq!(classify("False_color_urban.jpg"), Category::FalseColor);
        assert_eq!(classify("x_NDVI.jpg"), Category::Ndvi);
        assert_eq!(classify("Moisture_index_2023.png"), Category::MoistureIndex);
        assert_eq!(classify("lake_NDWI.jpg"), Category::Ndwi);
        assert_eq!(classify("Highlight_optimized.jpg"), Category::Highlight);
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(classify("False_color_NDWI.jpg"), Category::FalseColor);
        assert_eq!(classify("NDWI_False_color.jpg"), Category::FalseColor);
        assert_eq!(classify("Moisture_index_True_color.jpg"), Category::MoistureIndex);
        assert_eq!(classify("NDWI_Highlight.jpg"), Category::Ndwi);
        assert_eq!(classify("NDVI_False_color.jpg"), Category::Ndvi);
    }

    #[test]
    fn matching_is_case_sensitive_and_falls_back_to_generic() {
        assert_eq!(classify("true_color.jpg"), Category::Generic);
        assert_eq!(classify("ndwi.jpg"), Category::Generic);
        assert_eq!(classify("Moisture.jpg"), Category::Generic);
        assert_eq!(classify(""), Category::Generic);
    }

    #[test]
    fn tags_round_trip_through_dispatch() {
        for category in Category::ALL {
            match category.tag() {
                Some(tag) => assert_eq!(classify(&format!("scene_{tag}.jpg")), category),
                None => assert_eq!(category, Category::Generic),
            }
        }
    }
}
