use once_cell::sync::Lazy;
use regex::Regex;

struct RightsDefinition {
    abbreviations: &'static [&'static str],
    rights: &'static str,
}

// Abbreviations as they occur in legacy attribution strings, including
// the mis-encoded copyright glyph some records carry.
static RIGHTS_DEFINITIONS: &[RightsDefinition] = &[
    RightsDefinition {
        abbreviations: &["CC0"],
        rights: "http://creativecommons.org/publicdomain/zero/1.0/",
    },
    RightsDefinition {
        abbreviations: &["CC-BY"],
        rights: "http://creativecommons.org/licenses/by/4.0/",
    },
    RightsDefinition {
        abbreviations: &["CC-BY-NC", "CC BY-NC"],
        rights: "http://creativecommons.org/licenses/by-nc/4.0/",
    },
    RightsDefinition {
        abbreviations: &["CC-BY-NC-ND", "CC BY-NC-ND"],
        rights: "http://creativecommons.org/licenses/by-nc-nd/4.0/",
    },
    RightsDefinition {
        abbreviations: &["CC-BY-NC-SA", "CC BY-NC-SA"],
        rights: "http://creativecommons.org/licenses/by-nc-sa/4.0/",
    },
    RightsDefinition {
        abbreviations: &["CC-BY-ND", "CC BY-ND"],
        rights: "http://creativecommons.org/licenses/by-nd/4.0/",
    },
    RightsDefinition {
        abbreviations: &["CC-BY-SA", "CC BY-SA"],
        rights: "http://creativecommons.org/licenses/by-sa/4.0/",
    },
    RightsDefinition {
        abbreviations: &["Public-Domain", "Public Domain", "public domain"],
        rights: "http://creativecommons.org/publicdomain/mark/1.0/",
    },
    RightsDefinition {
        abbreviations: &["Copyright not evaluated"],
        rights: "http://rightsstatements.org/vocab/CNE/1.0/",
    },
    RightsDefinition {
        abbreviations: &["In Copyright", "In copyright", "in copyright", "Â©"],
        rights: "http://rightsstatements.org/vocab/InC/1.0/",
    },
];

// One regex per abbreviation, anchored to start/parenthesis/space on the
// left and punctuation/space/end on the right, so "CC-BY" does not match
// inside "CC-BY-NC-ND".
static TITLE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    RIGHTS_DEFINITIONS
        .iter()
        .flat_map(|def| {
            def.abbreviations.iter().map(|abbr| {
                let pattern = format!("(^|[( ]){}([., )]|$)", regex::escape(abbr));
                (Regex::new(&pattern).unwrap(), def.rights)
            })
        })
        .collect()
});

/// Exact lookup of a license abbreviation against the canonical table.
/// Case-sensitive; callers trim their input.
pub fn rights_from_abbreviation(abbr: &str) -> Option<&'static str> {
    RIGHTS_DEFINITIONS
        .iter()
        .find(|def| def.abbreviations.contains(&abbr))
        .map(|def| def.rights)
}

/// Scan a free-text title for rights abbreviation tokens. Returns the
/// canonical URI only when exactly one distinct statement occurs; zero
/// or several distinct matches are too ambiguous to act on, so nothing
/// is returned and the caller falls back to the raw license field.
pub fn rights_from_title(title: &str) -> Option<&'static str> {
    let mut found: Option<&'static str> = None;
    for (pattern, rights) in TITLE_PATTERNS.iter() {
        if pattern.is_match(title) {
            match found {
                None => found = Some(rights),
                Some(existing) if existing == *rights => {}
                Some(_) => return None,
            }
        }
    }
    found
}

/// A rights URI recovered from a title, together with the title text
/// left over once the matched token is stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRights {
    pub rights: &'static str,
    pub title: String,
}

/// Like [`rights_from_title`], but also removes the matched token from
/// the title, so "Painting (CC-BY) by X" becomes "Painting by X". Used
/// for image attribution titles where the license annotation would
/// otherwise be duplicated into the entry name.
pub fn extract_rights_from_title(title: &str) -> Option<TitleRights> {
    let rights = rights_from_title(title)?;

    let mut stripped = title.to_string();
    for (pattern, pattern_rights) in TITLE_PATTERNS.iter() {
        if *pattern_rights != rights {
            continue;
        }
        stripped = pattern
            .replace_all(&stripped, |caps: &regex::Captures| {
                let pre = caps.get(1).map_or("", |m| m.as_str());
                let post = caps.get(2).map_or("", |m| m.as_str());
                // A surrounding () pair goes with the token; other
                // boundary characters stay.
                if pre == "(" && post == ")" {
                    String::new()
                } else {
                    format!("{}{}", pre.trim_start_matches('('), post.trim_end_matches(')'))
                }
            })
            .into_owned();
    }

    let mut title = stripped.replace("  ", " ");
    title = title.replace(" .", ".").replace(" ,", ",");
    let title = title.trim().to_string();

    Some(TitleRights { rights, title })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_abbreviation_maps_to_its_uri() {
        for def in RIGHTS_DEFINITIONS {
            for abbr in def.abbreviations {
                assert_eq!(rights_from_abbreviation(abbr), Some(def.rights));
            }
        }
    }

    #[test]
    fn test_unknown_abbreviation_maps_to_nothing() {
        assert_eq!(rights_from_abbreviation("GPL-3.0"), None);
        assert_eq!(rights_from_abbreviation("cc-by"), None);
        assert_eq!(rights_from_abbreviation(""), None);
    }

    #[test]
    fn test_title_with_one_token() {
        assert_eq!(
            rights_from_title("Stilleven met bloemen (CC-BY-SA)"),
            Some("http://creativecommons.org/licenses/by-sa/4.0/")
        );
        assert_eq!(
            rights_from_title("Portrait, Public Domain, Rijksmuseum"),
            Some("http://creativecommons.org/publicdomain/mark/1.0/")
        );
    }

    #[test]
    fn test_title_with_two_distinct_tokens_is_ambiguous() {
        assert_eq!(rights_from_title("Collage (CC-BY) and (CC0) material"), None);
    }

    #[test]
    fn test_title_with_no_token() {
        assert_eq!(rights_from_title("Stilleven met bloemen"), None);
        assert_eq!(rights_from_title(""), None);
    }

    #[test]
    fn test_compound_abbreviation_does_not_match_its_prefix() {
        // "CC-BY-NC-ND" must resolve to the nc-nd URI, not count as an
        // additional CC-BY match.
        assert_eq!(
            rights_from_title("Drawing (CC-BY-NC-ND)"),
            Some("http://creativecommons.org/licenses/by-nc-nd/4.0/")
        );
    }

    #[test]
    fn test_repeated_token_still_unambiguous() {
        assert_eq!(
            rights_from_title("CC0 scan of a CC0 object"),
            Some("http://creativecommons.org/publicdomain/zero/1.0/")
        );
    }

    #[test]
    fn test_extract_strips_parenthesised_token() {
        let extracted = extract_rights_from_title("Painting (CC-BY) by Jan Steen").unwrap();
        assert_eq!(extracted.rights, "http://creativecommons.org/licenses/by/4.0/");
        assert_eq!(extracted.title, "Painting by Jan Steen");
    }

    #[test]
    fn test_extract_strips_bare_token() {
        let extracted = extract_rights_from_title("Etching CC0 Rijksmuseum").unwrap();
        assert_eq!(extracted.rights, "http://creativecommons.org/publicdomain/zero/1.0/");
        assert_eq!(extracted.title, "Etching Rijksmuseum");
    }

    #[test]
    fn test_extract_on_ambiguous_title() {
        assert_eq!(extract_rights_from_title("CC-BY or CC0, who knows"), None);
    }
}
