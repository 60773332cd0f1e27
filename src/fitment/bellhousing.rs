//! Bellhousing compatibility - which transmissions bolt to an engine
//!
//! The engine family is inferred from the model name and mapped to the
//! bellhousing pattern it uses. Transmissions whose pattern names that family
//! are compatible.

use crate::entities::{Engine, Transmission};

/// Model-name token to bellhousing pattern, checked top to bottom
pub const BELLHOUSING_PATTERNS: [(&str, &str); 10] = [
    ("LS", "GM LS"),
    // Gen V LT engines share the LS bolt pattern
    ("LT", "GM LS"),
    ("SBC", "GM SBC"),
    ("BBC", "GM BBC"),
    ("Coyote", "Ford Modular"),
    ("5.0", "Ford Modular"),
    ("HEMI", "Chrysler HEMI"),
    ("2JZ", "Toyota JZ"),
    ("RB", "Nissan RB"),
    ("SR20", "Nissan SR"),
];

/// Bellhousing pattern for an engine model, if its family is known
///
/// The first table token found anywhere in the model name wins,
/// case-insensitively.
pub fn bellhousing_for_model(model: &str) -> Option<&'static str> {
    let model = model.to_lowercase();
    BELLHOUSING_PATTERNS
        .iter()
        .find(|(token, _)| model.contains(&token.to_lowercase()))
        .map(|(_, pattern)| *pattern)
}

/// Whether a transmission's bellhousing names the given pattern
pub fn matches_pattern(transmission: &Transmission, pattern: &str) -> bool {
    let pattern = pattern.to_lowercase();
    transmission
        .bellhousing_pattern
        .as_deref()
        .is_some_and(|have| have.to_lowercase().contains(&pattern))
}

/// Result of a compatibility lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Compatibility<'a> {
    /// Pattern inferred from the engine, `None` when the family is unknown
    pub pattern: Option<&'static str>,
    /// Matching transmissions, in input order
    pub transmissions: Vec<&'a Transmission>,
}

/// Transmissions that fit an engine
///
/// When the engine family is unknown nothing can be ruled out, so every
/// transmission is returned.
pub fn compatible_transmissions<'a>(
    engine: &Engine,
    transmissions: &'a [Transmission],
) -> Compatibility<'a> {
    let pattern = bellhousing_for_model(&engine.model);
    let transmissions = match pattern {
        Some(pattern) => transmissions
            .iter()
            .filter(|t| matches_pattern(t, pattern))
            .collect(),
        None => transmissions.iter().collect(),
    };
    Compatibility {
        pattern,
        transmissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trans(model: &str, pattern: Option<&str>) -> Transmission {
        let mut t = Transmission::new("Tremec", model);
        t.bellhousing_pattern = pattern.map(str::to_string);
        t
    }

    #[test]
    fn test_bellhousing_for_model() {
        assert_eq!(bellhousing_for_model("LS3"), Some("GM LS"));
        assert_eq!(bellhousing_for_model("lt1"), Some("GM LS"));
        assert_eq!(bellhousing_for_model("Coyote 5.0"), Some("Ford Modular"));
        assert_eq!(bellhousing_for_model("5.0 Windsor"), Some("Ford Modular"));
        assert_eq!(bellhousing_for_model("6.4 HEMI"), Some("Chrysler HEMI"));
        assert_eq!(bellhousing_for_model("2JZ-GTE"), Some("Toyota JZ"));
        assert_eq!(bellhousing_for_model("RB26DETT"), Some("Nissan RB"));
        assert_eq!(bellhousing_for_model("SR20DET"), Some("Nissan SR"));
        assert_eq!(bellhousing_for_model("K20A"), None);
    }

    #[test]
    fn test_table_order_decides_ties() {
        // "SBC 350 LS-swap" holds both tokens; LS is listed first
        assert_eq!(bellhousing_for_model("SBC 350 LS-swap"), Some("GM LS"));
        assert_eq!(bellhousing_for_model("SBC 350"), Some("GM SBC"));
    }

    #[test]
    fn test_compatible_transmissions_filter_by_pattern() {
        let engine = Engine::new("Chevrolet", "LS3");
        let all = vec![
            trans("T56 Magnum", Some("GM LS")),
            trans("TKX", Some("Ford Modular")),
            trans("4L80E", Some("gm ls / vortec")),
            trans("Unknown", None),
        ];

        let result = compatible_transmissions(&engine, &all);
        assert_eq!(result.pattern, Some("GM LS"));
        let models: Vec<&str> = result.transmissions.iter().map(|t| t.model.as_str()).collect();
        assert_eq!(models, vec!["T56 Magnum", "4L80E"]);
    }

    #[test]
    fn test_unknown_family_returns_everything() {
        let engine = Engine::new("Honda", "K20A");
        let all = vec![trans("T56", Some("GM LS")), trans("Unknown", None)];

        let result = compatible_transmissions(&engine, &all);
        assert_eq!(result.pattern, None);
        assert_eq!(result.transmissions.len(), 2);
    }
}
