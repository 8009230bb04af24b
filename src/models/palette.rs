//! Member color palette
//!
//! New members are given a display color from a fixed palette. The slot is a
//! monotonically increasing reservation number handed out by the storage
//! layer, so two approvals can never derive the same slot from a shared count.

/// Fixed member color palette
pub const MEMBER_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

/// Color for a reserved palette slot
pub fn palette_color(slot: u64) -> &'static str {
    MEMBER_PALETTE[(slot % MEMBER_PALETTE.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), MEMBER_PALETTE[0]);
        assert_eq!(palette_color(9), MEMBER_PALETTE[9]);
        assert_eq!(palette_color(10), MEMBER_PALETTE[0]);
        assert_eq!(palette_color(23), MEMBER_PALETTE[3]);
    }

    #[test]
    fn test_palette_entries_are_distinct() {
        let mut colors = MEMBER_PALETTE.to_vec();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), MEMBER_PALETTE.len());
    }
}
