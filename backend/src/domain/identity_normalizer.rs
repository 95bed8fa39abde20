//! # Identity Normalizer
//!
//! Turns the user-info payload of a supported identity provider into a
//! [`CanonicalIdentity`]. Each provider has one pure mapping function and the
//! dispatch is an exhaustive match over [`ProviderTag`], so adding a provider
//! means adding a variant and its mapping function.
//!
//! Attribute handling:
//! - strings are taken as-is, numbers and booleans use their JSON text form
//! - identifiers given as numbers must be integral (`456` and `456.0` agree)
//! - `null`, arrays, objects and blank strings count as absent
//! - absent optional attributes become `None`, absent identifiers are an error

use serde_json::{Number, Value};
use tracing::debug;

use crate::domain::models::{CanonicalIdentity, IdentityError, ProviderTag, RawAttributes};

/// Stateless service mapping provider payloads to canonical identities
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl IdentityNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize attributes for a provider given by its textual tag
    pub fn normalize(
        &self,
        provider: &str,
        attributes: &RawAttributes,
    ) -> Result<CanonicalIdentity, IdentityError> {
        let tag: ProviderTag = provider.parse()?;
        self.normalize_provider(tag, attributes)
    }

    /// Normalize attributes for an already parsed provider tag
    pub fn normalize_provider(
        &self,
        provider: ProviderTag,
        attributes: &RawAttributes,
    ) -> Result<CanonicalIdentity, IdentityError> {
        debug!("Normalizing {} user info with {} attributes", provider, attributes.len());

        match provider {
            ProviderTag::Google => google_identity(attributes),
            ProviderTag::Vk => vk_identity(attributes),
        }
    }
}

/// OpenID Connect userinfo claims
fn google_identity(attributes: &RawAttributes) -> Result<CanonicalIdentity, IdentityError> {
    Ok(CanonicalIdentity {
        external_id: required_identifier(attributes, ProviderTag::Google, "sub")?,
        display_name: required_text(attributes, ProviderTag::Google, "name")?,
        email: attribute_text(attributes, "email"),
        avatar_url: attribute_text(attributes, "picture"),
        locale: attribute_text(attributes, "locale"),
    })
}

/// VK `users.get` response; VK discloses no locale
fn vk_identity(attributes: &RawAttributes) -> Result<CanonicalIdentity, IdentityError> {
    let first_name = required_text(attributes, ProviderTag::Vk, "first_name")?;
    let display_name = match attribute_text(attributes, "last_name") {
        Some(last_name) => format!("{} {}", first_name, last_name),
        None => first_name,
    };

    Ok(CanonicalIdentity {
        external_id: required_identifier(attributes, ProviderTag::Vk, "id")?,
        display_name,
        email: attribute_text(attributes, "email"),
        avatar_url: attribute_text(attributes, "photo_max"),
        locale: None,
    })
}

fn required_text(
    attributes: &RawAttributes,
    provider: ProviderTag,
    attribute: &'static str,
) -> Result<String, IdentityError> {
    attribute_text(attributes, attribute)
        .ok_or(IdentityError::MissingAttribute { provider, attribute })
}

/// Like [`required_text`], but a non-integral number is not an identifier
fn required_identifier(
    attributes: &RawAttributes,
    provider: ProviderTag,
    attribute: &'static str,
) -> Result<String, IdentityError> {
    match attributes.get(attribute) {
        Some(Value::Number(n)) => {
            integral_text(n).ok_or(IdentityError::MissingAttribute { provider, attribute })
        }
        _ => required_text(attributes, provider, attribute),
    }
}

/// Integer text of a number, including floats with no fractional part
fn integral_text(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return Some(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }

    // Beyond 2^53 a float no longer names one integer
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0)
        .map(|f| (f as i64).to_string())
}

fn attribute_text(attributes: &RawAttributes, key: &str) -> Option<String> {
    let text = match attributes.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => integral_text(n).unwrap_or_else(|| n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> RawAttributes {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {}", other),
        }
    }

    fn google_attrs() -> RawAttributes {
        attrs(json!({
            "sub": "123",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "picture": "http://img",
            "locale": "en"
        }))
    }

    fn vk_attrs() -> RawAttributes {
        attrs(json!({
            "id": 456,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "photo_max": "http://img"
        }))
    }

    #[test]
    fn test_google_identity() {
        let identity = IdentityNormalizer::new()
            .normalize("GOOGLE", &google_attrs())
            .unwrap();

        assert_eq!(
            identity,
            CanonicalIdentity {
                external_id: "123".to_string(),
                display_name: "Ada Lovelace".to_string(),
                email: Some("ada@example.com".to_string()),
                avatar_url: Some("http://img".to_string()),
                locale: Some("en".to_string()),
            }
        );
    }

    #[test]
    fn test_vk_identity() {
        let identity = IdentityNormalizer::new().normalize("VK", &vk_attrs()).unwrap();

        assert_eq!(
            identity,
            CanonicalIdentity {
                external_id: "456".to_string(),
                display_name: "Ada Lovelace".to_string(),
                email: Some("ada@example.com".to_string()),
                avatar_url: Some("http://img".to_string()),
                locale: None,
            }
        );
    }

    #[test]
    fn test_vk_locale_is_always_absent() {
        let mut attributes = vk_attrs();
        attributes.insert("locale".to_string(), json!("ru"));

        let identity = IdentityNormalizer::new()
            .normalize_provider(ProviderTag::Vk, &attributes)
            .unwrap();
        assert_eq!(identity.locale, None);
    }

    #[test]
    fn test_vk_string_and_numeric_ids_agree() {
        let normalizer = IdentityNormalizer::new();
        let mut as_string = vk_attrs();
        as_string.insert("id".to_string(), json!("456"));

        let from_number = normalizer.normalize_provider(ProviderTag::Vk, &vk_attrs()).unwrap();
        let from_string = normalizer.normalize_provider(ProviderTag::Vk, &as_string).unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_vk_float_id_matches_integer_id() {
        let normalizer = IdentityNormalizer::new();
        let mut as_float = vk_attrs();
        as_float.insert("id".to_string(), json!(456.0));

        let from_integer = normalizer.normalize_provider(ProviderTag::Vk, &vk_attrs()).unwrap();
        let from_float = normalizer.normalize_provider(ProviderTag::Vk, &as_float).unwrap();

        assert_eq!(from_float.external_id, "456");
        assert_eq!(from_integer, from_float);
    }

    #[test]
    fn test_fractional_id_is_rejected() {
        let mut attributes = vk_attrs();
        attributes.insert("id".to_string(), json!(456.5));

        let err = IdentityNormalizer::new()
            .normalize_provider(ProviderTag::Vk, &attributes)
            .unwrap_err();
        assert_eq!(
            err,
            IdentityError::MissingAttribute {
                provider: ProviderTag::Vk,
                attribute: "id",
            }
        );
    }

    #[test]
    fn test_vk_without_last_name_uses_first_name() {
        let mut attributes = vk_attrs();
        attributes.remove("last_name");

        let identity = IdentityNormalizer::new()
            .normalize_provider(ProviderTag::Vk, &attributes)
            .unwrap();
        assert_eq!(identity.display_name, "Ada");
    }

    #[test]
    fn test_unsupported_provider_is_reported() {
        let err = IdentityNormalizer::new()
            .normalize("FACEBOOK", &google_attrs())
            .unwrap_err();

        assert_eq!(err, IdentityError::UnsupportedProvider("FACEBOOK".to_string()));
        assert!(err.to_string().contains("FACEBOOK"));
    }

    #[test]
    fn test_missing_optional_attributes_become_absent() {
        let mut attributes = google_attrs();
        attributes.remove("locale");
        attributes.insert("picture".to_string(), Value::Null);
        attributes.insert("email".to_string(), json!("   "));

        let identity = IdentityNormalizer::new()
            .normalize_provider(ProviderTag::Google, &attributes)
            .unwrap();

        assert_eq!(identity.locale, None);
        assert_eq!(identity.avatar_url, None);
        assert_eq!(identity.email, None);
        assert_eq!(identity.external_id, "123");
    }

    #[test]
    fn test_missing_identifier_is_an_error() {
        let mut attributes = google_attrs();
        attributes.remove("sub");

        let err = IdentityNormalizer::new()
            .normalize_provider(ProviderTag::Google, &attributes)
            .unwrap_err();
        assert_eq!(
            err,
            IdentityError::MissingAttribute {
                provider: ProviderTag::Google,
                attribute: "sub",
            }
        );

        let mut attributes = vk_attrs();
        attributes.insert("first_name".to_string(), json!(["Ada"]));
        let err = IdentityNormalizer::new()
            .normalize_provider(ProviderTag::Vk, &attributes)
            .unwrap_err();
        assert!(matches!(
            err,
            IdentityError::MissingAttribute { attribute: "first_name", .. }
        ));
    }

    #[test]
    fn test_every_provider_yields_id_and_name() {
        let normalizer = IdentityNormalizer::new();
        for tag in ProviderTag::ALL {
            let attributes = match tag {
                ProviderTag::Google => google_attrs(),
                ProviderTag::Vk => vk_attrs(),
            };
            let identity = normalizer.normalize_provider(tag, &attributes).unwrap();
            assert!(!identity.external_id.is_empty());
            assert!(!identity.display_name.is_empty());
        }
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let normalizer = IdentityNormalizer::new();
        let attributes = google_attrs();

        let first = normalizer.normalize("google", &attributes).unwrap();
        let second = normalizer.normalize("google", &attributes).unwrap();
        assert_eq!(first, second);
    }
}
