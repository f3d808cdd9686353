/// Canonical form of a movie title guess: uppercase, ASCII letters and
/// digits only. Stored guesses and answers are always compared in this
/// form, so "Bāhubali: The Beginning!" and "bahubali the beginning" match.
pub fn normalize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_whitespace() {
        assert_eq!(normalize_title("K.G.F: Chapter 2"), "KGFCHAPTER2");
        assert_eq!(normalize_title("  3 Idiots  "), "3IDIOTS");
    }

    #[test]
    fn uppercases() {
        assert_eq!(normalize_title("bahubali"), "BAHUBALI");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(normalize_title("Bāhubali"), "BHUBALI");
    }

    #[test]
    fn idempotent() {
        let once = normalize_title("Mungaru Male!");
        assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn empty_when_nothing_survives() {
        assert_eq!(normalize_title("???!!!"), "");
        assert_eq!(normalize_title(""), "");
    }
}
