//! URL-safe identifier fragments: slugs for subdomains and export filenames.

use uuid::Uuid;

/// Maximum slug length before a random suffix is appended.
const MAX_SLUG_LEN: usize = 20;

/// Turns free text into a URL-safe fragment: lowercase, non-alphanumeric
/// runs collapse to a single hyphen, edge hyphens trimmed, truncated to
/// 20 characters. Idempotent on already-slug input.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen && !slug.is_empty() {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derives a subdomain from a display name: `slugify(name)` plus a 4-char
/// random suffix for uniqueness. Collisions are still possible and are
/// surfaced at save time, not prevented here.
pub fn generate_subdomain(name: &str) -> String {
    let base = slugify(name);
    let uuid = Uuid::new_v4().simple().to_string();
    if base.is_empty() {
        format!("portfolio-{}", &uuid[..4])
    } else {
        format!("{base}-{}", &uuid[..4])
    }
}

/// Filename for a downloaded optimized resume: `optimized-resume-<slug>.txt`.
pub fn export_filename(job_title: &str) -> String {
    let slug = slugify(job_title);
    if slug.is_empty() {
        "optimized-resume.txt".to_string()
    } else {
        format!("optimized-resume-{slug}.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Jane Doe"), "jane-doe");
        assert_eq!(slugify("Senior Software Engineer"), "senior-software-engi");
    }

    #[test]
    fn test_slugify_collapses_symbol_runs() {
        assert_eq!(slugify("a  --  b"), "a-b");
        assert_eq!(slugify("c++ & rust!"), "c-rust");
    }

    #[test]
    fn test_slugify_trims_edges() {
        let slug = slugify("  ~Jane~  ");
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
        assert_eq!(slug, "jane");
    }

    #[test]
    fn test_slugify_is_idempotent_on_slug_input() {
        let once = slugify("Dr. María-José O'Neill");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_slugify_charset_and_length() {
        let slug = slugify("An Extremely Long Professional Display Name Indeed");
        assert!(slug.len() <= 20);
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }

    #[test]
    fn test_slugify_truncation_does_not_leave_trailing_hyphen() {
        // 20th char lands on the separator; the trailing hyphen must go.
        let slug = slugify("aaaaaaaaaaaaaaaaaaa bbbb");
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_generate_subdomain_shape() {
        let sub = generate_subdomain("Jane Doe");
        let (base, suffix) = sub.rsplit_once('-').unwrap();
        assert_eq!(base, "jane-doe");
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_subdomain_empty_name_falls_back() {
        let sub = generate_subdomain("!!!");
        assert!(sub.starts_with("portfolio-"));
        assert_eq!(sub.len(), "portfolio-".len() + 4);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("Senior Rust Engineer"),
            "optimized-resume-senior-rust-engineer.txt"
        );
        assert_eq!(export_filename(""), "optimized-resume.txt");
    }
}
