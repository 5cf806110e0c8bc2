/// Derives a URL-safe identifier from a display title: lowercase, runs of
/// non-alphanumeric characters collapse into a single hyphen, and leading or
/// trailing hyphens are trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Web Development"), "web-development");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(slugify("Rust -- The Basics!"), "rust-the-basics");
        assert_eq!(slugify("C++ & Friends"), "c-friends");
    }

    #[test]
    fn trims_edge_hyphens() {
        assert_eq!(slugify("  Leading and trailing  "), "leading-and-trailing");
        assert_eq!(slugify("!!!wow!!!"), "wow");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Intro to Python 3"), "intro-to-python-3");
    }

    #[test]
    fn non_ascii_becomes_separator() {
        assert_eq!(slugify("naïve approach"), "na-ve-approach");
    }

    #[test]
    fn empty_and_symbol_only_titles_yield_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("###"), "");
    }

    #[test]
    fn identical_titles_collide() {
        assert_eq!(slugify("Data Science"), slugify("data science"));
    }
}
