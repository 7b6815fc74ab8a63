use uuid::Uuid;

/// Role a generated name plays inside a test environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRole {
    Organization,
    Space,
    Quota,
}

impl NameRole {
    /// Token embedded in generated names
    pub fn token(&self) -> &'static str {
        match self {
            NameRole::Organization => "ORG",
            NameRole::Space => "SPACE",
            NameRole::Quota => "QUOTA",
        }
    }
}

/// Generate a collision-free resource name of the form
/// `{prefix}-{shard_index}-{ROLE}-{suffix}`.
///
/// The suffix is a v4 UUID, so repeated generations never collide even
/// across concurrent test processes sharing a prefix and shard.
pub fn generate_name(prefix: &str, shard_index: u8, role: NameRole) -> String {
    format!(
        "{}-{}-{}-{}",
        prefix,
        shard_index,
        role.token(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn names_match_expected_shape() {
        let pattern = Regex::new(r"^UNIT-TEST-[0-9]-(ORG|SPACE|QUOTA)-[0-9a-f]{32}$").unwrap();
        for role in [NameRole::Organization, NameRole::Space, NameRole::Quota] {
            let name = generate_name("UNIT-TEST", 3, role);
            assert!(pattern.is_match(&name), "unexpected name: {}", name);
        }
    }

    #[test]
    fn repeated_generations_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(generate_name("UNIT-TEST", 1, NameRole::Organization)));
        }
    }

    proptest! {
        #[test]
        fn name_shape_holds_for_any_prefix(prefix in "[A-Z]{2,12}", shard in 0u8..=9) {
            let name = generate_name(&prefix, shard, NameRole::Space);
            let head = format!("{}-{}-SPACE-", prefix, shard);
            prop_assert!(name.starts_with(&head));
            let suffix = &name[head.len()..];
            prop_assert_eq!(suffix.len(), 32);
            prop_assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
