//! Category Classification
//!
//! Maps the free-text category returned by the prediction service onto a
//! fixed set of tiers, and each tier onto its recommendation bundle, icon
//! and theme.
//!
//! # Vocabulary
//!
//! The service speaks Indonesian air quality labels:
//!
//! | Label                | Tier            |
//! |----------------------|-----------------|
//! | `baik`               | `Good`          |
//! | `sedang`             | `Moderate`      |
//! | `sangat tidak sehat` | `VeryUnhealthy` |
//! | `tidak sehat`        | `Unhealthy`     |
//!
//! `sangat tidak sehat` contains `tidak sehat`. Each label therefore lists the
//! longer labels that shadow it, and an occurrence that is the tail of a
//! shadowing label never counts. Precedence in the label table still follows
//! Good, Moderate, VeryUnhealthy, Unhealthy, but correctness does not depend
//! on that order.
//!
//! Everything here is a pure function over static tables.

use std::fmt;

use serde::Serialize;

use crate::mode::PredictionMode;

// ============================================================================
// Tiers
// ============================================================================

/// Canonical classification bucket derived from a category string
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationTier {
    /// `baik`
    Good,
    /// `sedang`
    Moderate,
    /// `tidak sehat`
    Unhealthy,
    /// `sangat tidak sehat`
    VeryUnhealthy,
    /// No vocabulary term matched
    Unknown,
}

impl ClassificationTier {
    /// The Indonesian label this tier is matched by
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Good => Some("baik"),
            Self::Moderate => Some("sedang"),
            Self::Unhealthy => Some("tidak sehat"),
            Self::VeryUnhealthy => Some("sangat tidak sehat"),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ClassificationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Unhealthy => "unhealthy",
            Self::VeryUnhealthy => "very unhealthy",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// One vocabulary entry
#[derive(Debug)]
struct Label {
    text: &'static str,
    tier: ClassificationTier,
    /// Longer labels that end with `text`
    shadowed_by: &'static [&'static str],
}

impl Label {
    /// True if `haystack` holds an occurrence of this label that is not the
    /// tail of a shadowing label. `haystack` must already be lowercased.
    fn occurs_in(&self, haystack: &str) -> bool {
        haystack.match_indices(self.text).any(|(idx, _)| {
            let end = idx + self.text.len();
            !self
                .shadowed_by
                .iter()
                .any(|longer| haystack[..end].ends_with(longer))
        })
    }
}

/// Vocabulary in precedence order
const LABELS: [Label; 4] = [
    Label {
        text: "baik",
        tier: ClassificationTier::Good,
        shadowed_by: &[],
    },
    Label {
        text: "sedang",
        tier: ClassificationTier::Moderate,
        shadowed_by: &[],
    },
    Label {
        text: "sangat tidak sehat",
        tier: ClassificationTier::VeryUnhealthy,
        shadowed_by: &[],
    },
    Label {
        text: "tidak sehat",
        tier: ClassificationTier::Unhealthy,
        shadowed_by: &["sangat tidak sehat"],
    },
];

/// Classify a category string returned by the prediction service
///
/// Matching is case-insensitive substring containment.
#[must_use]
pub fn classify(category: &str) -> ClassificationTier {
    let lowered = category.to_lowercase();
    LABELS
        .iter()
        .find(|label| label.occurs_in(&lowered))
        .map_or(ClassificationTier::Unknown, |label| label.tier)
}

// ============================================================================
// Themes
// ============================================================================

/// Surface-agnostic colour token
///
/// Surfaces map tokens to their own palette; [`ThemeToken::rgb`] gives a
/// reasonable default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeToken {
    /// Good readings
    Green,
    /// Moderate readings
    Yellow,
    /// Unhealthy readings
    Orange,
    /// Very unhealthy readings
    Red,
    /// Storm accents in the weather family
    Purple,
    /// Neutral background
    Blue,
    /// Unclassified foreground
    White,
}

impl ThemeToken {
    /// Default RGB value for the token
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Green => (74, 222, 128),
            Self::Yellow => (250, 204, 21),
            Self::Orange => (251, 146, 60),
            Self::Red => (248, 113, 113),
            Self::Purple => (168, 85, 247),
            Self::Blue => (96, 165, 250),
            Self::White => (255, 255, 255),
        }
    }
}

// ============================================================================
// Recommendations
// ============================================================================

/// Health guidance shown for a tier
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecommendationBundle {
    /// Panel heading
    pub title: &'static str,
    /// What the tier means for health
    pub description: &'static str,
    /// Suggested actions, most important first
    pub actions: &'static [&'static str],
    /// Accent colour of the panel
    pub theme: ThemeToken,
}

/// Footnote displayed under every recommendation panel
pub const RECOMMENDATION_NOTE: &str = "These recommendations are general guidelines. \
Please follow official guidance from local authorities during severe air quality events.";

static GOOD: RecommendationBundle = RecommendationBundle {
    title: "Good Air Quality",
    description: "The air quality is considered satisfactory, and air pollution poses little \
or no risk. You can enjoy outdoor activities without concern for air quality impacts.",
    actions: &[
        "Continue regular outdoor activities",
        "Keep windows open for fresh air",
        "Ideal time for outdoor exercise",
    ],
    theme: ThemeToken::Green,
};

static MODERATE: RecommendationBundle = RecommendationBundle {
    title: "Moderate Air Quality",
    description: "Air quality is acceptable; however, there may be a moderate health concern \
for a very small number of people who are unusually sensitive to air pollution.",
    actions: &[
        "Sensitive individuals should consider reducing prolonged outdoor exertion",
        "Keep windows closed if you have respiratory conditions",
        "Monitor air quality changes",
    ],
    theme: ThemeToken::Yellow,
};

static UNHEALTHY: RecommendationBundle = RecommendationBundle {
    title: "Unhealthy Air Quality",
    description: "Everyone may begin to experience health effects; members of sensitive \
groups may experience more serious health effects.",
    actions: &[
        "Reduce prolonged or heavy outdoor exertion",
        "Take more breaks during outdoor activities",
        "Consider rescheduling strenuous outdoor activities",
        "People with respiratory or heart disease should stay indoors",
    ],
    theme: ThemeToken::Orange,
};

static VERY_UNHEALTHY: RecommendationBundle = RecommendationBundle {
    title: "Very Unhealthy Air Quality",
    description: "Health warnings of emergency conditions. The entire population is more \
likely to be affected.",
    actions: &[
        "Avoid all outdoor physical activity",
        "Stay indoors and keep windows closed",
        "Use air purifiers if available",
        "Wear masks if you must go outside",
        "Follow local health authority recommendations",
    ],
    theme: ThemeToken::Red,
};

/// Recommendation bundle for a tier, `None` for [`ClassificationTier::Unknown`]
#[must_use]
pub fn recommendation_for(tier: ClassificationTier) -> Option<&'static RecommendationBundle> {
    match tier {
        ClassificationTier::Good => Some(&GOOD),
        ClassificationTier::Moderate => Some(&MODERATE),
        ClassificationTier::Unhealthy => Some(&UNHEALTHY),
        ClassificationTier::VeryUnhealthy => Some(&VERY_UNHEALTHY),
        ClassificationTier::Unknown => None,
    }
}

// ============================================================================
// Icons
// ============================================================================

/// Icon shapes across both families
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconGlyph {
    /// Weather: good
    CloudSun,
    /// Weather: moderate or unknown
    Cloud,
    /// Weather: unhealthy
    CloudRain,
    /// Weather: very unhealthy
    CloudLightning,
    /// Air quality: good or unknown
    CheckCircle,
    /// Air quality: moderate
    AlertTriangle,
    /// Air quality: unhealthy
    XCircle,
    /// Air quality: very unhealthy
    AlertCircle,
}

impl IconGlyph {
    /// Single-character rendering for text surfaces
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::CloudSun => "\u{26c5}",
            Self::Cloud => "\u{2601}",
            Self::CloudRain => "\u{1f327}",
            Self::CloudLightning => "\u{26c8}",
            Self::CheckCircle => "\u{2714}",
            Self::AlertTriangle => "\u{26a0}",
            Self::XCircle => "\u{2716}",
            Self::AlertCircle => "\u{2757}",
        }
    }
}

/// Icon shown next to a result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ResultIcon {
    /// Shape
    pub glyph: IconGlyph,
    /// Colour
    pub tone: ThemeToken,
}

impl ResultIcon {
    const fn new(glyph: IconGlyph, tone: ThemeToken) -> Self {
        Self { glyph, tone }
    }
}

/// Pick the icon for a tier from the family belonging to `mode`
///
/// Date requests use the weather family, parameter requests the air quality
/// family.
#[must_use]
pub fn icon_for(mode: PredictionMode, tier: ClassificationTier) -> ResultIcon {
    use ClassificationTier as T;
    use IconGlyph as G;

    match mode {
        PredictionMode::Date => match tier {
            T::Good => ResultIcon::new(G::CloudSun, ThemeToken::Green),
            T::Moderate => ResultIcon::new(G::Cloud, ThemeToken::Yellow),
            T::Unhealthy => ResultIcon::new(G::CloudRain, ThemeToken::Red),
            T::VeryUnhealthy => ResultIcon::new(G::CloudLightning, ThemeToken::Purple),
            T::Unknown => ResultIcon::new(G::Cloud, ThemeToken::White),
        },
        PredictionMode::Parameters => match tier {
            T::Good => ResultIcon::new(G::CheckCircle, ThemeToken::Green),
            T::Moderate => ResultIcon::new(G::AlertTriangle, ThemeToken::Yellow),
            T::Unhealthy => ResultIcon::new(G::XCircle, ThemeToken::Orange),
            T::VeryUnhealthy => ResultIcon::new(G::AlertCircle, ThemeToken::Red),
            T::Unknown => ResultIcon::new(G::CheckCircle, ThemeToken::White),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_vocabulary() {
        assert_eq!(classify("Kualitas udara BAIK hari ini"), ClassificationTier::Good);
        assert_eq!(classify("sedang"), ClassificationTier::Moderate);
        assert_eq!(classify("tidak sehat"), ClassificationTier::Unhealthy);
        assert_eq!(classify("sangat tidak sehat"), ClassificationTier::VeryUnhealthy);
        assert_eq!(classify("xyz"), ClassificationTier::Unknown);
        assert_eq!(classify(""), ClassificationTier::Unknown);
    }

    #[test]
    fn test_very_unhealthy_never_downgraded() {
        let samples = [
            "sangat tidak sehat",
            "SANGAT TIDAK SEHAT",
            "Sangat Tidak Sehat",
            "Kategori: sangat tidak sehat (PM10)",
            "udara sangat tidak sehat!",
            "sangat tidak sehatsangat tidak sehat",
        ];
        for sample in samples {
            assert_eq!(
                classify(sample),
                ClassificationTier::VeryUnhealthy,
                "misclassified {sample:?}"
            );
        }
    }

    #[test]
    fn test_shadowing_is_per_occurrence() {
        // A later standalone occurrence still counts
        let label = &LABELS[3];
        assert!(!label.occurs_in("sangat tidak sehat"));
        assert!(label.occurs_in("sangat tidak sehat, lalu tidak sehat"));
        assert!(label.occurs_in("tidak sehat"));
    }

    #[test]
    fn test_shadowing_independent_of_order() {
        let lowered = "sangat tidak sehat";
        let mut reversed: Vec<&Label> = LABELS.iter().collect();
        reversed.reverse();
        let tier = reversed
            .iter()
            .find(|label| label.occurs_in(lowered))
            .map(|label| label.tier);
        assert_eq!(tier, Some(ClassificationTier::VeryUnhealthy));
    }

    #[test]
    fn test_labels_round_trip_through_classify() {
        for label in &LABELS {
            assert_eq!(classify(label.text), label.tier);
            assert_eq!(label.tier.label(), Some(label.text));
        }
    }

    #[test]
    fn test_recommendation_table() {
        assert!(recommendation_for(ClassificationTier::Unknown).is_none());

        let good = recommendation_for(ClassificationTier::Good).unwrap();
        assert_eq!(good.title, "Good Air Quality");
        assert_eq!(good.theme, ThemeToken::Green);
        assert_eq!(good.actions.len(), 3);

        let very = recommendation_for(ClassificationTier::VeryUnhealthy).unwrap();
        assert_eq!(very.title, "Very Unhealthy Air Quality");
        assert_eq!(very.theme, ThemeToken::Red);
        assert_eq!(very.actions[0], "Avoid all outdoor physical activity");
        assert_eq!(very.actions.len(), 5);

        let unhealthy = recommendation_for(ClassificationTier::Unhealthy).unwrap();
        assert_eq!(unhealthy.theme, ThemeToken::Orange);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let category = "Sangat Tidak Sehat";
        let first = classify(category);
        let second = classify(category);
        assert_eq!(first, second);
        assert_eq!(recommendation_for(first), recommendation_for(second));
    }

    #[test]
    fn test_icon_families() {
        let weather = icon_for(PredictionMode::Date, ClassificationTier::VeryUnhealthy);
        assert_eq!(weather.glyph, IconGlyph::CloudLightning);
        assert_eq!(weather.tone, ThemeToken::Purple);

        let air = icon_for(PredictionMode::Parameters, ClassificationTier::VeryUnhealthy);
        assert_eq!(air.glyph, IconGlyph::AlertCircle);
        assert_eq!(air.tone, ThemeToken::Red);

        assert_eq!(
            icon_for(PredictionMode::Date, ClassificationTier::Unknown).tone,
            ThemeToken::White
        );
        assert_eq!(
            icon_for(PredictionMode::Parameters, ClassificationTier::Unknown).glyph,
            IconGlyph::CheckCircle
        );
    }
}
