use nanoid::nanoid;

const SUFFIX_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h',
    'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// `APP-<unix millis>-<9 lowercase alphanumerics>`. Best-effort unique only.
pub fn generate_application_id() -> String {
    format!(
        "APP-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        nanoid!(9, &SUFFIX_ALPHABET)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_timestamp_and_alphanumeric_suffix() {
        let id = generate_application_id();
        let parts: Vec<&str> = id.splitn(3, '-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "APP");
        assert!(!parts[1].is_empty() && parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| SUFFIX_ALPHABET.contains(&c)));
    }

    #[test]
    fn consecutive_ids_differ() {
        assert_ne!(generate_application_id(), generate_application_id());
    }
}
