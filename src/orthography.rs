//! Visual-similarity costing.
//!
//! Two characters are "visually similar" iff their bitmasks share a bit.
//! The table is a fixed, process-wide immutable mapping built once.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Groups of characters commonly confused for each other by eye (or by
/// OCR/keyboard adjacency). Each group occupies one bit; a character can
/// belong to more than one group.
const GROUPS: &[&[char]] = &[
    &['0', 'o', 'O'],
    &['1', 'l', 'I', 'i'],
    &['5', 's', 'S'],
    &['8', 'b', 'B'],
    &['2', 'z', 'Z'],
    &['6', 'g', 'G'],
    &['c', 'C'],
    &['k', 'K'],
    &['v', 'V', 'u', 'U'],
    &['w', 'W'],
    &['x', 'X'],
    &['y', 'Y'],
    &['a', 'A', '@'],
    &['e', 'E', 'i'],
    &['t', 'T', '7'],
    &['m', 'n'],
    &['p', 'P'],
    &['q', 'Q'],
    &['f', 'F'],
    &['d', 'D'],
];

fn table() -> &'static HashMap<char, u32> {
    static TABLE: OnceLock<HashMap<char, u32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = HashMap::new();
        for (bit, group) in GROUPS.iter().enumerate() {
            let mask = 1u32 << bit;
            for &c in *group {
                *map.entry(c).or_insert(0) |= mask;
            }
        }
        map
    })
}

/// Returns the bitmask of visual-similarity groups `c` belongs to, or 0
/// if it belongs to none.
pub fn mask_of(c: char) -> u32 {
    table().get(&c).copied().unwrap_or(0)
}

/// Whether `a` and `b` share a visual-similarity group.
pub fn visually_similar(a: char, b: char) -> bool {
    let (ma, mb) = (mask_of(a), mask_of(b));
    ma != 0 && mb != 0 && (ma & mb) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_oh_are_similar() {
        assert!(visually_similar('0', 'o'));
        assert!(visually_similar('0', 'O'));
    }

    #[test]
    fn unrelated_letters_are_not_similar() {
        assert!(!visually_similar('q', 'z'));
    }

    #[test]
    fn similarity_is_symmetric() {
        for &group in GROUPS {
            for &a in group {
                for &b in group {
                    assert!(visually_similar(a, b));
                    assert!(visually_similar(b, a));
                }
            }
        }
    }

    #[test]
    fn unknown_characters_have_zero_mask() {
        assert_eq!(mask_of('\u{1F600}'), 0);
        assert!(!visually_similar('\u{1F600}', '\u{1F600}'));
    }
}
