//! Tier module - coarse four-level bucketing of a resolved order

use crate::CategoryCode;
use std::collections::HashMap;

/// Tier of a code within the final ranking
///
/// Narrated as a court hierarchy:
/// - Dominant: the ruler
/// - High: trusted aides
/// - Middle: ordinary citizens
/// - Low: exiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Top of the hierarchy
    Dominant,

    /// Close behind the dominant codes
    High,

    /// The middle of the order
    Middle,

    /// Bottom of the hierarchy
    Low,
}

impl Tier {
    /// All tiers from highest to lowest
    pub const ALL: [Tier; 4] = [Tier::Dominant, Tier::High, Tier::Middle, Tier::Low];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Dominant => "Dominant",
            Tier::High => "High",
            Tier::Middle => "Middle",
            Tier::Low => "Low",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dominant" => Some(Tier::Dominant),
            "high" => Some(Tier::High),
            "middle" => Some(Tier::Middle),
            "low" => Some(Tier::Low),
            _ => None,
        }
    }

    /// Default tier for a zero-based position in the flattened order
    ///
    /// Two codes per tier; everything from position 6 on is `Low`.
    pub fn for_position(index: usize) -> Self {
        match index {
            0..=1 => Tier::Dominant,
            2..=3 => Tier::High,
            4..=5 => Tier::Middle,
            _ => Tier::Low,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign a tier to every code of a resolved ranking
///
/// A user override wins; otherwise the positional default applies. Overrides
/// for codes absent from `ranking` are ignored.
pub fn assign_tiers(
    ranking: &[CategoryCode],
    overrides: &HashMap<CategoryCode, Tier>,
) -> Vec<(CategoryCode, Tier)> {
    ranking
        .iter()
        .enumerate()
        .map(|(index, code)| {
            let tier = overrides
                .get(code)
                .copied()
                .unwrap_or_else(|| Tier::for_position(index));
            (code.clone(), tier)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_defaults() {
        let tiers: Vec<Tier> = (0..9).map(Tier::for_position).collect();
        assert_eq!(
            tiers,
            vec![
                Tier::Dominant,
                Tier::Dominant,
                Tier::High,
                Tier::High,
                Tier::Middle,
                Tier::Middle,
                Tier::Low,
                Tier::Low,
                Tier::Low,
            ]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Tier::parse("Dominant"), Some(Tier::Dominant));
        assert_eq!(Tier::parse("low"), Some(Tier::Low));
        assert_eq!("MIDDLE".parse::<Tier>(), Ok(Tier::Middle));
        assert!("king".parse::<Tier>().is_err());
    }

    #[test]
    fn test_assign_with_overrides() {
        let ranking: Vec<CategoryCode> = ["Ni", "Ti", "Fe"]
            .iter()
            .map(|s| CategoryCode::new(*s).unwrap())
            .collect();
        let mut overrides = HashMap::new();
        overrides.insert(ranking[1].clone(), Tier::Low);
        overrides.insert(CategoryCode::new("Se").unwrap(), Tier::Dominant);

        let tiers = assign_tiers(&ranking, &overrides);
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].1, Tier::Dominant);
        assert_eq!(tiers[1].1, Tier::Low);
        assert_eq!(tiers[2].1, Tier::High);
    }
}
