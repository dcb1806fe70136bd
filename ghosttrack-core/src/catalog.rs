//! Fixed ghost catalog and display-name normalization.

/// Ghost names in catalog order. Catalog order is the tie-break order for the
/// stable leader and the cell order of the remaining-ghosts grid.
pub const GHOST_NAMES: [&str; 27] = [
    "БАНШИ",
    "ДАЙАН",
    "ДЕОГЕН",
    "ДЕМОН",
    "ГАЛЛУ",
    "ГОРЁ",
    "ХАНТУ",
    "ДЖИНН",
    "МАРА",
    "МОРОЙ",
    "МЮЛИНГ",
    "ОБАКЭ",
    "ОБАМБО",
    "ОНИ",
    "ОНРЁ",
    "ФАНТОМ",
    "ПОЛТЕРГЕЙСТ",
    "РАЙДЗЮ",
    "РЕВЕНАНТ",
    "ТЕНЬ",
    "ДУХ",
    "ТАЙЭ",
    "МИМИК",
    "БЛИЗНЕЦЫ",
    "МИРАЖ",
    "ЁКАЙ",
    "ЮРЭЙ",
];

/// Ordered set of entity names shared by the ghost-keyed domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    /// Catalog of the built-in ghost names.
    #[must_use]
    pub fn ghosts() -> Self {
        Self::from_names(GHOST_NAMES)
    }

    /// Build a catalog from arbitrary names, dropping blanks and case-insensitive duplicates.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || unique.iter().any(|known| names_match(known, name)) {
                continue;
            }
            unique.push(name.to_string());
        }
        Self { names: unique }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Catalog position of `name`, compared case-insensitively.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names.iter().position(|known| names_match(known, name))
    }

    /// Canonical spelling of `name` as stored in the catalog.
    #[must_use]
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.names[idx].as_str())
    }

    /// Display names in catalog order (`БАНШИ` becomes `Банши`).
    #[must_use]
    pub fn display_names(&self) -> Vec<String> {
        self.names.iter().map(|name| to_display_name(name)).collect()
    }

    /// Names containing `query`, case-insensitively. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.names
            .iter()
            .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::ghosts()
    }
}

/// Case-insensitive name equality used for every entity lookup.
#[must_use]
pub fn names_match(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Lowercase the name and uppercase its first character.
#[must_use]
pub fn to_display_name(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }
    let lowered = name.to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lowered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_unique_and_ordered() {
        let catalog = Catalog::ghosts();
        assert_eq!(catalog.len(), 27);
        assert_eq!(catalog.names()[0], "БАНШИ");
        assert_eq!(catalog.names()[26], "ЮРЭЙ");
        assert_eq!(catalog.position("полтергейст"), Some(16));
        assert_eq!(catalog.canonical(" мимик "), Some("МИМИК"));
        assert!(catalog.position("CASPER").is_none());
    }

    #[test]
    fn display_names_are_capitalized() {
        assert_eq!(to_display_name("БАНШИ"), "Банши");
        assert_eq!(to_display_name("ЁКАЙ"), "Ёкай");
        assert_eq!(to_display_name("ghost"), "Ghost");
        assert_eq!(to_display_name(" "), " ");
        let display = Catalog::ghosts().display_names();
        assert_eq!(display[3], "Демон");
    }

    #[test]
    fn duplicates_and_blanks_are_dropped() {
        let catalog = Catalog::from_names(["Alpha", "", "ALPHA", "Beta"]);
        assert_eq!(catalog.names(), ["Alpha".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = Catalog::ghosts();
        assert_eq!(catalog.search("мо"), vec!["ДЕМОН", "МОРОЙ"]);
        assert_eq!(catalog.search("").len(), 27);
        assert!(catalog.search("zzz").is_empty());
    }
}
