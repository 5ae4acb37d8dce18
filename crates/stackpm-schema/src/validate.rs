use crate::ManifestError;

/// Hackage package names: alphanumeric components joined by single hyphens,
/// each component containing at least one letter.
pub fn validate_name(name: &str) -> Result<(), ManifestError> {
    if name.is_empty() {
        return Err(ManifestError::InvalidName {
            name: name.to_owned(),
            reason: "package name must not be empty",
        });
    }
    if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(ManifestError::InvalidName {
            name: name.to_owned(),
            reason: "package name must match [a-zA-Z0-9-]",
        });
    }
    if name
        .split('-')
        .any(|part| part.is_empty() || part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(ManifestError::InvalidName {
            name: name.to_owned(),
            reason: "every hyphen-separated component needs at least one letter",
        });
    }
    Ok(())
}

/// Pinned versions are dotted numbers. A hyphen would break the last-hyphen
/// split used to read `name-version` tokens back.
pub fn validate_version(version: &str) -> Result<(), ManifestError> {
    let valid = !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(ManifestError::InvalidVersion(version.to_owned()))
    }
}
