use std::collections::BTreeSet;

pub const EU: &str = "EU";
pub const US: &str = "US";

// Member states by name and ISO 3166 alpha-2 code.
const EU_MEMBERS: &[(&str, &str)] = &[
    ("austria", "at"),
    ("belgium", "be"),
    ("bulgaria", "bg"),
    ("croatia", "hr"),
    ("cyprus", "cy"),
    ("czechia", "cz"),
    ("czech republic", "cz"),
    ("denmark", "dk"),
    ("estonia", "ee"),
    ("finland", "fi"),
    ("france", "fr"),
    ("germany", "de"),
    ("greece", "gr"),
    ("hungary", "hu"),
    ("ireland", "ie"),
    ("italy", "it"),
    ("latvia", "lv"),
    ("lithuania", "lt"),
    ("luxembourg", "lu"),
    ("malta", "mt"),
    ("netherlands", "nl"),
    ("poland", "pl"),
    ("portugal", "pt"),
    ("romania", "ro"),
    ("slovakia", "sk"),
    ("slovenia", "si"),
    ("spain", "es"),
    ("sweden", "se"),
];

/// Normalize a country name, ISO code or region label into a regulatory region.
///
/// Unknown names are kept (trimmed, upper-cased) so they still count towards
/// multi-jurisdiction operation.
pub fn region_for(country: &str) -> Option<String> {
    let normalized = country.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let region = match normalized.as_str() {
        "eu" | "european union" | "eea" => EU.to_string(),
        "us" | "usa" | "united states" | "united states of america" => US.to_string(),
        "uk" | "gb" | "united kingdom" | "great britain" => "UK".to_string(),
        "ca" | "canada" => "CA".to_string(),
        other => {
            if EU_MEMBERS
                .iter()
                .any(|(name, code)| *name == other || *code == other)
            {
                EU.to_string()
            } else {
                country.trim().to_ascii_uppercase()
            }
        }
    };

    Some(region)
}

/// Distinct regions for a set of countries, sorted for deterministic output.
pub fn regions<'a, I>(countries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    countries
        .into_iter()
        .filter_map(|country| region_for(country))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_states_collapse_to_eu() {
        assert_eq!(region_for("Germany").as_deref(), Some(EU));
        assert_eq!(region_for(" FR ").as_deref(), Some(EU));
        assert_eq!(region_for("United States").as_deref(), Some(US));
        assert_eq!(region_for("Japan").as_deref(), Some("JAPAN"));
        assert_eq!(region_for("  "), None);
    }

    #[test]
    fn regions_are_distinct_and_sorted() {
        let countries = vec![
            "Germany".to_string(),
            "France".to_string(),
            "USA".to_string(),
            "EU".to_string(),
        ];
        assert_eq!(regions(&countries), vec![EU.to_string(), US.to_string()]);
    }
}
