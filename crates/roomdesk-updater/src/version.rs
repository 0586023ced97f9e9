use semver::Version;

use crate::error::UpdateError;

fn parse(v: &str) -> Result<Version, UpdateError> {
    let trimmed = v.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|e| UpdateError::Parse(format!("version `{v}`: {e}")))
}

/// Whether `candidate` should replace `current`.
///
/// Pre-release candidates only qualify when `allow_prerelease` is set.
pub fn is_newer(candidate: &str, current: &str, allow_prerelease: bool) -> Result<bool, UpdateError> {
    let candidate = parse(candidate)?;
    let current = parse(current)?;
    if !candidate.pre.is_empty() && !allow_prerelease {
        return Ok(false);
    }
    Ok(candidate > current)
}
