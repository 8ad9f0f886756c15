//! Region tokens shared by the region facet of every list screen.
//!
//! Backend payloads write regions in Korean ("서울 강남구"), the bundled
//! fallback data in romanized form ("Seoul Gangnam-gu"). A facet token
//! matches either spelling.

use crate::utils::contains_ignore_case;

/// `(token, Korean name)` in display order.
pub const REGIONS: [(&str, &str); 8] = [
    ("seoul", "서울"),
    ("gyeonggi", "경기"),
    ("incheon", "인천"),
    ("busan", "부산"),
    ("daegu", "대구"),
    ("gwangju", "광주"),
    ("daejeon", "대전"),
    ("ulsan", "울산"),
];

/// Selectable values of the region facet.
pub const REGION_TOKENS: [&str; 8] = tokens(&REGIONS);

const fn tokens<const N: usize>(regions: &[(&'static str, &'static str); N]) -> [&'static str; N] {
    let mut out = [""; N];
    let mut i = 0;
    while i < N {
        out[i] = regions[i].0;
        i += 1;
    }
    out
}

/// Korean name of a region token.
pub fn korean_name(token: &str) -> Option<&'static str> {
    REGIONS.iter().find(|(t, _)| *t == token).map(|(_, ko)| *ko)
}

/// Region-facet predicate: substring match on the token or its Korean name.
/// A missing or blank field never excludes.
pub fn region_matches(field: Option<&str>, token: &str) -> bool {
    let Some(field) = field.filter(|f| !f.trim().is_empty()) else {
        return true;
    };
    contains_ignore_case(field, token) || korean_name(token).is_some_and(|ko| field.contains(ko))
}
