//! Tier-name arithmetic.
//!
//! Atlas instance tiers are named with a one-letter class prefix followed
//! by digits ("M30", "R40"). Ordering comparisons only care about the
//! numeric part.

/// Reduce a tier name to its numeric ordinal.
///
/// Strips a leading `M`/`R` class prefix (case-insensitive) if present and
/// parses the remainder as an unsigned integer; a bare number parses as
/// itself. Returns 0 for empty input or anything unparseable. Total —
/// never panics.
///
/// 0 means "unknown tier". Callers must not compare it as a legitimate
/// low tier.
pub fn tier_ordinal(name: &str) -> u32 {
    let name = name.trim();
    if name.is_empty() {
        return 0;
    }
    let digits = match name.chars().next() {
        Some('M' | 'm' | 'R' | 'r') => &name[1..],
        _ => name,
    };
    digits.parse().unwrap_or(0)
}

/// True iff `tier` falls within `[min, max]` by ordinal comparison.
pub fn within_bounds(tier: &str, min: &str, max: &str) -> bool {
    let t = tier_ordinal(tier);
    tier_ordinal(min) <= t && t <= tier_ordinal(max)
}
