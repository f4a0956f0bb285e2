use crate::models::{MenuItem, MenuRecommendation};

const MENU_MARKERS: &[&str] = &["- Menu:", "Menu:"];
const REASON_MARKERS: &[&str] = &["Alasan:", "Reason:"];

/// Splits a candidate line into `(name, reason)`
///
/// Requires a leading menu marker and splits once, on the earliest reason marker.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let rest = MENU_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))?;

    let (at, marker) = REASON_MARKERS
        .iter()
        .filter_map(|marker| rest.find(marker).map(|at| (at, *marker)))
        .min_by_key(|(at, _)| *at)?;

    let name = rest[..at]
        .trim()
        .trim_end_matches([',', ';', '-'])
        .trim();
    let reason = rest[at + marker.len()..].trim();

    if name.is_empty() {
        return None;
    }
    Some((name, reason))
}

/// First item whose name contains the candidate, or is contained by it
fn find_item<'a>(items: &'a [MenuItem], candidate: &str) -> Option<&'a MenuItem> {
    let candidate = candidate.to_lowercase();
    items.iter().find(|item| {
        let name = item.name.to_lowercase();
        name.contains(&candidate) || candidate.contains(&name)
    })
}

/// Extracts recommendations from free-text generator output
///
/// Non-conforming and unmatched lines are skipped. Repeated names produce repeated
/// entries; the caller applies the result cap.
pub fn parse_recommendations(text: &str, items: &[MenuItem]) -> Vec<MenuRecommendation> {
    let mut recommendations = Vec::new();

    for line in text.lines() {
        let Some((name, reason)) = split_line(line) else {
            continue;
        };

        match find_item(items, name) {
            Some(item) => recommendations.push(MenuRecommendation::new(item.clone(), reason)),
            None => tracing::debug!(candidate = %name, "Generated menu name matched no item"),
        }
    }

    recommendations
}
