// REST endpoint paths.
//
// Templates carry `{placeholder}` segments for parent identifiers. The
// `{DOMAIN_UUID}` placeholder is left in place for `FmcClient` to fill from
// the session's domain table.

use fmc_api::client::DOMAIN_PLACEHOLDER;

use crate::error::CoreError;

/// A collection endpoint template with parent identifiers bound in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    template: String,
}

impl ResourcePath {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Interpolate `{name}` with a parent identifier.
    pub fn bind(mut self, name: &str, value: &str) -> Result<Self, CoreError> {
        validate_segment(name, value)?;
        self.template = self.template.replace(&format!("{{{name}}}"), value);
        Ok(self)
    }

    /// The collection path. Fails while any parent placeholder is unbound.
    pub fn collection(&self) -> Result<String, CoreError> {
        let rest = self.template.replace(DOMAIN_PLACEHOLDER, "");
        if let Some(start) = rest.find('{') {
            let end = rest[start..].find('}').map_or(rest.len(), |i| start + i + 1);
            return Err(CoreError::validation(format!(
                "path parameter {} is not set",
                &rest[start..end]
            )));
        }
        Ok(self.template.clone())
    }

    /// The single-object path `{collection}/{id}`.
    pub fn object(&self, id: &str) -> Result<String, CoreError> {
        validate_segment("id", id)?;
        Ok(format!("{}/{id}", self.collection()?))
    }
}

/// Identifiers are interpolated verbatim, so reject anything that would
/// change the path structure.
fn validate_segment(name: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::validation(format!("{name} must not be empty")));
    }
    if value.contains(['/', '?', '#', '{', '}']) || value.chars().any(char::is_whitespace) {
        return Err(CoreError::validation(format!(
            "{name} '{value}' is not a valid path segment"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RULES: &str =
        "/api/fmc_config/v1/domain/{DOMAIN_UUID}/policy/accesspolicies/{access_policy_id}/accessrules";

    #[test]
    fn binds_parent_id() {
        let path = ResourcePath::new(RULES)
            .bind("access_policy_id", "005056B4-ABCD")
            .unwrap();
        assert_eq!(
            path.collection().unwrap(),
            "/api/fmc_config/v1/domain/{DOMAIN_UUID}/policy/accesspolicies/005056B4-ABCD/accessrules"
        );
        assert_eq!(
            path.object("r1").unwrap(),
            "/api/fmc_config/v1/domain/{DOMAIN_UUID}/policy/accesspolicies/005056B4-ABCD/accessrules/r1"
        );
    }

    #[test]
    fn unbound_parent_is_rejected() {
        let err = ResourcePath::new(RULES).collection().unwrap_err();
        assert!(err.to_string().contains("{access_policy_id}"));
    }

    #[test]
    fn path_breaking_ids_are_rejected() {
        assert!(ResourcePath::new(RULES).bind("access_policy_id", "a/b").is_err());
        assert!(ResourcePath::new(RULES).bind("access_policy_id", "").is_err());
        let zones = ResourcePath::new("/api/fmc_config/v1/domain/{DOMAIN_UUID}/object/securityzones");
        assert!(zones.object("x?y").is_err());
    }
}
