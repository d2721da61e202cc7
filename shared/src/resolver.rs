//! Free-text place names to canonical regions.
//!
//! Tiers run in order and the first hit wins. Curated aliases sit ahead of
//! the leading-token heuristic so that known spellings never fall through
//! to a looser match.

use crate::geometry::RegionFeature;

/// Canonical region name to the alternative spellings it is known by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, Vec<String>)>,
}

impl AliasTable {
    pub fn new<I, N, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<A>)>,
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, aliases)| {
                    let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
                    (name.into(), aliases)
                })
                .collect(),
        }
    }

    /// Spellings seen in the product catalog.
    pub fn vietnam() -> Self {
        Self::new([
            ("Thừa Thiên Huế", vec!["Huế", "Thua Thien Hue"]),
            ("Hồ Chí Minh", vec!["TP. Hồ Chí Minh", "Ho Chi Minh", "Sài Gòn"]),
            ("Hà Nội", vec!["Ha Noi", "Hanoi"]),
            ("Đà Nẵng", vec!["Da Nang", "Danang"]),
            ("Cần Thơ", vec!["Can Tho"]),
            ("Lào Cai", vec!["Lao Cai"]),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(name, aliases)| (name.as_str(), aliases.as_slice()))
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::vietnam()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Equal to a canonical name.
    Exact,
    /// Equal to a listed alias, or containing the canonical name it belongs to.
    Alias,
    /// Leading tokens (split on a single space) contained in either direction.
    Partial,
}

impl Matcher {
    pub fn find<'a>(
        self,
        text: &str,
        features: &'a [RegionFeature],
        aliases: &AliasTable,
    ) -> Option<&'a RegionFeature> {
        match self {
            Self::Exact => features.iter().find(|f| f.id == text),
            Self::Alias => aliases
                .iter()
                .filter(|(name, spellings)| {
                    spellings.iter().any(|s| s == text) || text.contains(name)
                })
                .find_map(|(name, _)| features.iter().find(|f| f.id == name)),
            Self::Partial => {
                let token = leading_token(text);
                if token.is_empty() {
                    return None;
                }
                features.iter().find(|f| {
                    let name_token = leading_token(&f.id);
                    f.id.contains(token) || (!name_token.is_empty() && text.contains(name_token))
                })
            }
        }
    }
}

fn leading_token(s: &str) -> &str {
    s.split(' ').next().unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct NameResolver {
    aliases: AliasTable,
    tiers: Vec<Matcher>,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(AliasTable::default())
    }
}

impl NameResolver {
    pub fn new(aliases: AliasTable) -> Self {
        let tiers = vec![Matcher::Exact, Matcher::Alias, Matcher::Partial];
        Self::with_tiers(aliases, tiers)
    }

    pub fn with_tiers(aliases: AliasTable, tiers: Vec<Matcher>) -> Self {
        Self { aliases, tiers }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// `None` means nothing to highlight; it is not an error.
    pub fn resolve<'a>(
        &self,
        text: &str,
        features: &'a [RegionFeature],
    ) -> Option<&'a RegionFeature> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        for tier in &self.tiers {
            if let Some(feature) = tier.find(text, features, &self.aliases) {
                tracing::debug!(text, region = %feature.id, ?tier, "resolved place name");
                return Some(feature);
            }
        }
        tracing::debug!(text, "place name did not resolve");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology;

    fn features() -> Vec<RegionFeature> {
        topology::decode(crate::BUNDLED_TOPOLOGY, "states").unwrap()
    }

    fn resolve(text: &str) -> Option<String> {
        let features = features();
        NameResolver::default()
            .resolve(text, &features)
            .map(|f| f.id.clone())
    }

    #[test]
    fn canonical_names_resolve_to_themselves() {
        for feature in features() {
            assert_eq!(resolve(&feature.id).as_deref(), Some(feature.id.as_str()));
        }
    }

    #[test]
    fn aliases_resolve_to_canonical_region() {
        assert_eq!(resolve("Sài Gòn").as_deref(), Some("Hồ Chí Minh"));
        assert_eq!(resolve("TP. Hồ Chí Minh").as_deref(), Some("Hồ Chí Minh"));
        assert_eq!(resolve("Hanoi").as_deref(), Some("Hà Nội"));
        assert_eq!(resolve("Huế").as_deref(), Some("Thừa Thiên Huế"));
    }

    #[test]
    fn text_containing_a_canonical_name_resolves() {
        assert_eq!(resolve("Làng lụa, Hà Nội").as_deref(), Some("Hà Nội"));
    }

    #[test]
    fn leading_token_fallback() {
        assert_eq!(resolve("Cần Giờ").as_deref(), Some("Cần Thơ"));
        // First feature in document order wins.
        assert_eq!(resolve("Hà Tĩnh").as_deref(), Some("Hà Giang"));
    }

    #[test]
    fn unrelated_and_blank_text_resolve_to_nothing() {
        assert_eq!(resolve("Atlantis"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   "), None);
    }

    #[test]
    fn alias_tier_skips_canonical_names_missing_from_the_dataset() {
        let features = features();
        let aliases = AliasTable::new([
            ("Bình Dương", vec!["Binh Duong"]),
            ("Hà Nội", vec!["Binh Duong"]),
        ]);
        let hit = Matcher::Alias.find("Binh Duong", &features, &aliases);
        assert_eq!(hit.map(|f| f.id.as_str()), Some("Hà Nội"));
    }

    #[test]
    fn tiers_are_independent() {
        let features = features();
        let aliases = AliasTable::vietnam();
        let find = |matcher: Matcher| matcher.find("Sài Gòn", &features, &aliases);
        assert!(find(Matcher::Exact).is_none());
        assert!(find(Matcher::Partial).is_none());
        assert!(find(Matcher::Alias).is_some());

        let exact_only = NameResolver::with_tiers(aliases, vec![Matcher::Exact]);
        assert!(exact_only.resolve("Hanoi", &features).is_none());
    }
}
