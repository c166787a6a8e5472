// src/exec/ansi.rs

//! Escape-sequence scrubbing for forwarded child output.
//!
//! Captured output is replayed onto the parent's terminal, so sequences
//! that reposition to the origin or erase the display would clobber the
//! shared screen. Those are removed; every other byte, including all other
//! ANSI formatting, passes through unmodified.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::bytes::Regex;

/// Cursor-to-origin (`ESC[H` and its explicit forms) and erase-display
/// (`ESC[J` .. `ESC[3J`) sequences.
static DISRUPTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)\x1b\[(?:(?:0;0|1;1|;)?H|[0-3]?J)").expect("denylist regex is valid")
});

/// Remove disruptive escape sequences from a captured output buffer.
///
/// Runs to a fixpoint: a removal can splice surrounding bytes into a new
/// denylisted sequence, so one pass is not always enough.
pub fn scrub(buf: &[u8]) -> Cow<'_, [u8]> {
    match DISRUPTIVE.replace_all(buf, &b""[..]) {
        Cow::Borrowed(clean) => Cow::Borrowed(clean),
        Cow::Owned(mut owned) => {
            while DISRUPTIVE.is_match(&owned) {
                owned = DISRUPTIVE.replace_all(&owned, &b""[..]).into_owned();
            }
            Cow::Owned(owned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clear_screen_and_home_are_removed() {
        assert_eq!(scrub(b"\x1b[2J\x1b[Hhello").as_ref(), b"hello");
        assert_eq!(scrub(b"\x1b[J\x1b[3J\x1b[1;1H\x1b[;H").as_ref(), b"");
    }

    #[test]
    fn colour_codes_pass_through() {
        let input = b"\x1b[31mred\x1b[0m plain \x1b[1;32mbold green\x1b[0m";
        assert_eq!(scrub(input).as_ref(), input);
    }

    #[test]
    fn cursor_moves_to_other_positions_pass_through() {
        let input = b"\x1b[10;5Hpositioned\x1b[2Kcleared line";
        assert_eq!(scrub(input).as_ref(), input);
    }

    #[test]
    fn bytes_around_a_removed_sequence_are_kept() {
        assert_eq!(scrub(b"before\x1b[2Jafter").as_ref(), b"beforeafter");
    }

    proptest! {
        #[test]
        fn scrubbed_output_never_contains_a_denylisted_sequence(input in proptest::collection::vec(any::<u8>(), 0..512)) {
            let out = scrub(&input);
            prop_assert!(!DISRUPTIVE.is_match(&out));
        }

        #[test]
        fn escape_free_input_is_untouched(input in proptest::collection::vec(0u8..0x1b, 0..256)) {
            let out = scrub(&input);
            prop_assert_eq!(out.as_ref(), input.as_slice());
        }
    }
}
