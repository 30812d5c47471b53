//! Display cleanup for Census geography names.
//!
//! The names endpoint qualifies every entity with its parent and its
//! legal/statistical type, e.g. `"Los Angeles city, California"` or
//! `"Cook County, Illinois"`. Pickers only show the local part.

/// Entity-type suffixes stripped from place names, checked in order.
pub const PLACE_SUFFIXES: &[&str] = &[" city", " CDP", " borough", " town", " village"];

/// Returns the part of a qualified Census name before the first comma.
fn local_part(name: &str) -> &str {
    name.split(',').next().unwrap_or(name)
}

/// Cleans a Census place name for display.
///
/// Drops the `", State"` qualifier, then strips the first matching
/// suffix from [`PLACE_SUFFIXES`] and trims surrounding whitespace.
#[must_use]
pub fn clean_place_name(name: &str) -> String {
    let local = local_part(name);
    let stripped = PLACE_SUFFIXES
        .iter()
        .find_map(|suffix| local.strip_suffix(suffix))
        .unwrap_or(local);
    stripped.trim().to_string()
}

/// Cleans a Census county name for display by dropping everything after
/// the first comma (`"Los Angeles County, California"` becomes
/// `"Los Angeles County"`).
#[must_use]
pub fn clean_county_name(name: &str) -> String {
    local_part(name).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_city_suffix_and_state() {
        assert_eq!(clean_place_name("Los Angeles city, California"), "Los Angeles");
    }

    #[test]
    fn strips_each_entity_type() {
        assert_eq!(
            clean_place_name("East Los Angeles CDP, California"),
            "East Los Angeles"
        );
        assert_eq!(clean_place_name("Ketchikan borough, Alaska"), "Ketchikan");
        assert_eq!(clean_place_name("Hempstead village, New York"), "Hempstead");
        assert_eq!(clean_place_name("Vail town, Colorado"), "Vail");
    }

    #[test]
    fn only_first_matching_suffix_is_removed() {
        assert_eq!(clean_place_name("Carson City city, Nevada"), "Carson City");
    }

    #[test]
    fn leaves_unqualified_names_alone() {
        assert_eq!(
            clean_place_name("Nashville-Davidson metropolitan government (balance), Tennessee"),
            "Nashville-Davidson metropolitan government (balance)"
        );
        assert_eq!(clean_place_name("  Springfield  "), "Springfield");
    }

    #[test]
    fn county_drops_state_qualifier() {
        assert_eq!(
            clean_county_name("Los Angeles County, California"),
            "Los Angeles County"
        );
        assert_eq!(clean_county_name("Orleans Parish"), "Orleans Parish");
    }
}
