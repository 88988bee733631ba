//! Campaign slug generation
//!
//! `<base>-<YYYYMMDD>-<4 random base36 chars>`, where `base` is the title
//! reduced to `[a-z0-9-]` and capped at 28 characters. Accents and
//! compatibility forms are folded first (`Café` → `cafe`, `Ｐ２` → `p2`).

use chrono::NaiveDate;
use rand::Rng;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const BASE_MAX_CHARS: usize = 28;
const SUFFIX_CHARS: usize = 4;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase ASCII letters and digits joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    let folded = title
        .chars()
        .flat_map(char::to_lowercase)
        .nfkd()
        .filter(|c| !is_combining_mark(*c));
    for c in folded {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn random_suffix(rng: &mut impl Rng) -> String {
    (0..SUFFIX_CHARS)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Generate a slug for `title` that `taken` does not report as used
pub fn generate_slug(title: &str, date: NaiveDate, taken: impl Fn(&str) -> bool) -> String {
    let mut base = slugify(title);
    if base.is_empty() {
        base = "campaign".to_string();
    }
    base.truncate(BASE_MAX_CHARS);

    let day = date.format("%Y%m%d");
    let mut rng = rand::thread_rng();
    loop {
        let slug = format!("{}-{}-{}", base, day, random_suffix(&mut rng));
        if !taken(&slug) {
            return slug;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Summer Poster Sale!"), "summer-poster-sale");
        assert_eq!(slugify("--A  B--"), "a-b");
        assert_eq!(slugify("海報團 2024"), "2024");
        assert_eq!(slugify("海報團"), "");
    }

    #[test]
    fn test_slugify_folds_accents_and_width() {
        assert_eq!(slugify("Café Poster"), "cafe-poster");
        assert_eq!(slugify("Ｐoster２"), "poster2");
        assert_eq!(slugify("Crème Brûlée 2024"), "creme-brulee-2024");
    }

    #[test]
    fn test_generate_slug_shape() {
        let slug = generate_slug("Summer Poster Sale", date(), |_| false);
        let (head, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(head, "summer-poster-sale-20240501");
        assert_eq!(suffix.len(), 4);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_generate_slug_fallback_and_truncation() {
        assert!(generate_slug("海報團", date(), |_| false).starts_with("campaign-20240501-"));

        let long = "a".repeat(40);
        let slug = generate_slug(&long, date(), |_| false);
        assert!(slug.starts_with(&format!("{}-20240501-", "a".repeat(28))));
    }

    #[test]
    fn test_generate_slug_retries_on_collision() {
        let attempts = Cell::new(0);
        let slug = generate_slug("x", date(), |_| {
            attempts.set(attempts.get() + 1);
            attempts.get() < 3
        });
        assert_eq!(attempts.get(), 3);
        assert!(slug.starts_with("x-20240501-"));
    }
}
