//! Storage key derivation.

use chrono::{DateTime, Utc};

use super::error::AvatarError;
use depot_shared::{Identity, KeyStrategy};

/// Folder every avatar key lives under.
const KEY_PREFIX: &str = "public";

/// Filename used when the client sent none.
const DEFAULT_FILENAME: &str = "avatar";

/// Derive the storage key for an upload.
///
/// - `FixedPerUser`: `public/{user_id}`
/// - `Timestamped`: `public/{unix_millis}_{sanitized_filename}`
pub fn derive_key(
    strategy: KeyStrategy,
    identity: Option<&Identity>,
    file_name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String, AvatarError> {
    match strategy {
        KeyStrategy::FixedPerUser => {
            let identity = identity.ok_or(AvatarError::MissingIdentity)?;
            Ok(format!("{KEY_PREFIX}/{}", identity.id))
        }
        KeyStrategy::Timestamped => {
            let name = file_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(DEFAULT_FILENAME);
            Ok(format!(
                "{KEY_PREFIX}/{}_{}",
                now.timestamp_millis(),
                sanitize_filename(name)
            ))
        }
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
/// A name made only of dots would address a directory and becomes `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        sanitized.replace('.', "_")
    } else {
        sanitized
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Sanitized filenames only contain characters safe in a storage path.
    proptest! {
        #[test]
        fn prop_sanitized_filename_safe_chars(filename in ".*") {
            let sanitized = sanitize_filename(&filename);

            for c in sanitized.chars() {
                let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
            }
        }
    }

    // Timestamped keys are always `public/{millis}_{name}` with exactly one slash.
    proptest! {
        #[test]
        fn prop_timestamped_key_format(
            filename in ".{0,60}",
            millis in 0i64..4_102_444_800_000,
        ) {
            let now = chrono::DateTime::from_timestamp_millis(millis).expect("in range");
            let key = derive_key(KeyStrategy::Timestamped, None, Some(&filename), now)
                .expect("timestamped keys never fail");

            let parts: Vec<&str> = key.split('/').collect();
            prop_assert_eq!(parts.len(), 2);
            prop_assert_eq!(parts[0], "public");
            let prefix = format!("{millis}_");
            prop_assert!(parts[1].starts_with(&prefix));
            prop_assert!(parts[1].len() > prefix.len());
        }
    }
}
