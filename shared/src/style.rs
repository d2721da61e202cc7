//! Presentation rules for regions, labels and the selection marker.

use serde::Serialize;

use crate::centroid::CentroidStrategy;
use crate::geometry::{RegionFeature, RegionKind};
use crate::region_map::RegionMap;

/// Theme colors, resolved by the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Primary,
    Secondary,
    Accent,
    Bg,
    Text,
}

impl ColorToken {
    pub fn css_var(self) -> &'static str {
        match self {
            Self::Primary => "var(--primary)",
            Self::Secondary => "var(--secondary)",
            Self::Accent => "var(--accent)",
            Self::Bg => "var(--bg)",
            Self::Text => "var(--text)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionStyle {
    pub fill: ColorToken,
    pub stroke: ColorToken,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl RegionStyle {
    /// Hover only restyles regions that are not selected.
    pub fn for_region(kind: RegionKind, selected: bool, hovered: bool) -> Self {
        let exclave = kind == RegionKind::Exclave;
        let stroke = if exclave {
            ColorToken::Accent
        } else {
            ColorToken::Primary
        };

        if selected {
            return Self {
                fill: ColorToken::Accent,
                stroke,
                stroke_width: 3.0,
                opacity: 0.9,
            };
        }

        let (fill, opacity) = match (exclave, hovered) {
            (true, true) => (ColorToken::Accent, 0.8),
            (true, false) => (ColorToken::Secondary, 0.9),
            (false, true) => (ColorToken::Secondary, 0.8),
            (false, false) => (ColorToken::Bg, 0.7),
        };
        Self {
            fill,
            stroke,
            stroke_width: if exclave { 2.0 } else { 1.0 },
            opacity,
        }
    }
}

pub const LABELED_REGIONS: [&str; 7] = [
    "Hà Nội",
    "Hồ Chí Minh",
    "Đà Nẵng",
    "Thừa Thiên Huế",
    "Cần Thơ",
    "Hoàng Sa",
    "Trường Sa",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Base-canvas position of the feature's centroid.
pub fn anchor(
    map: &RegionMap,
    feature: &RegionFeature,
    centroid: &dyn CentroidStrategy,
) -> Option<(f64, f64)> {
    centroid
        .centroid(&feature.geometry)
        .map(|c| map.projection().project(c))
}

/// Labels for every region on the fixed list that is present in `map`.
pub fn region_labels(map: &RegionMap, centroid: &dyn CentroidStrategy) -> Vec<Label> {
    map.features()
        .iter()
        .filter(|f| LABELED_REGIONS.contains(&f.id.as_str()))
        .filter_map(|f| {
            let (x, y) = anchor(map, f, centroid)?;
            Some(Label {
                text: f.id.clone(),
                x,
                y,
            })
        })
        .collect()
}

/// Pulsing ring drawn over the region picked through an external item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionMarker {
    pub x: f64,
    pub y: f64,
}

impl SelectionMarker {
    /// Only shown while an external item is active and a region is highlighted.
    pub fn place(
        map: &RegionMap,
        selected_region: Option<&str>,
        has_external_item: bool,
        centroid: &dyn CentroidStrategy,
    ) -> Option<Self> {
        if !has_external_item {
            return None;
        }
        let feature = map.get(selected_region?)?;
        let (x, y) = anchor(map, feature, centroid)?;
        Some(Self { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BUNDLED_TOPOLOGY;
    use crate::centroid::VertexMean;
    use crate::config::MapConfig;

    #[test]
    fn ordinary_region_styles() {
        let idle = RegionStyle::for_region(RegionKind::Ordinary, false, false);
        assert_eq!(
            idle,
            RegionStyle {
                fill: ColorToken::Bg,
                stroke: ColorToken::Primary,
                stroke_width: 1.0,
                opacity: 0.7,
            }
        );
        let hover = RegionStyle::for_region(RegionKind::Ordinary, false, true);
        assert_eq!((hover.fill, hover.opacity), (ColorToken::Secondary, 0.8));
    }

    #[test]
    fn exclave_styles() {
        let idle = RegionStyle::for_region(RegionKind::Exclave, false, false);
        assert_eq!(
            idle,
            RegionStyle {
                fill: ColorToken::Secondary,
                stroke: ColorToken::Accent,
                stroke_width: 2.0,
                opacity: 0.9,
            }
        );
        let hover = RegionStyle::for_region(RegionKind::Exclave, false, true);
        assert_eq!((hover.fill, hover.opacity), (ColorToken::Accent, 0.8));
    }

    #[test]
    fn selection_wins_over_hover() {
        for kind in [RegionKind::Ordinary, RegionKind::Exclave] {
            let style = RegionStyle::for_region(kind, true, true);
            assert_eq!(style.fill, ColorToken::Accent);
            assert_eq!(style.stroke_width, 3.0);
            assert_eq!(style.opacity, 0.9);
        }
    }

    #[test]
    fn tokens_name_theme_variables() {
        let tokens = [
            ColorToken::Primary,
            ColorToken::Secondary,
            ColorToken::Accent,
            ColorToken::Bg,
            ColorToken::Text,
        ];
        let vars: Vec<&str> = tokens.iter().map(|t| t.css_var()).collect();
        assert_eq!(
            vars,
            [
                "var(--primary)",
                "var(--secondary)",
                "var(--accent)",
                "var(--bg)",
                "var(--text)"
            ]
        );
    }

    #[test]
    fn labels_cover_listed_regions_only() {
        let map = RegionMap::load(BUNDLED_TOPOLOGY, &MapConfig::default()).unwrap();
        let labels = region_labels(&map, &VertexMean);
        let names: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(names.len(), LABELED_REGIONS.len());
        assert!(!names.contains(&"Lào Cai"));
        for label in &labels {
            assert!((0.0..=600.0).contains(&label.x));
            assert!((0.0..=400.0).contains(&label.y));
        }
    }

    #[test]
    fn marker_needs_item_and_region() {
        let map = RegionMap::load(BUNDLED_TOPOLOGY, &MapConfig::default()).unwrap();
        let place = |region: Option<&str>, has_item: bool| {
            SelectionMarker::place(&map, region, has_item, &VertexMean)
        };
        assert!(place(Some("Hà Nội"), false).is_none());
        assert!(place(None, true).is_none());
        assert!(place(Some("Atlantis"), true).is_none());

        let marker = place(Some("Hà Nội"), true).unwrap();
        let label = region_labels(&map, &VertexMean)
            .into_iter()
            .find(|l| l.text == "Hà Nội")
            .unwrap();
        assert_eq!((marker.x, marker.y), (label.x, label.y));
    }
}
