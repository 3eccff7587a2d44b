use serde::Deserialize;

/// Currency context captured from the active locale by the platform bridge.
///
/// Two generations of the locale API expose the currency differently: the
/// modern API reports a full currency value, while older runtimes only expose
/// a bare currency-code field. Both are captured at the bridge so the same
/// fallback works on either runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleContext {
    /// Currency identifier reported by the modern locale API.
    #[serde(default)]
    pub currency: Option<String>,
    /// Currency code reported by the legacy locale field.
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// Best-effort currency for a transaction that does not carry one itself.
///
/// Prefers the modern locale currency when the runtime supplied it, falling
/// back to the legacy currency-code field. The value is derived from the
/// locale, not from the transaction, and is not authoritative.
pub fn default_currency(locale: &LocaleContext) -> Option<String> {
    locale
        .currency
        .clone()
        .or_else(|| locale.currency_code.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(currency: Option<&str>, currency_code: Option<&str>) -> LocaleContext {
        LocaleContext {
            currency: currency.map(str::to_owned),
            currency_code: currency_code.map(str::to_owned),
        }
    }

    #[test]
    fn test_modern_and_legacy_fields_resolve_consistently() {
        // A locale observed through either generation of the locale API must
        // resolve to the same identifier.
        let modern_only = locale(Some("USD"), None);
        let legacy_only = locale(None, Some("USD"));
        let both = locale(Some("USD"), Some("USD"));

        assert_eq!(default_currency(&modern_only), Some("USD".to_owned()));
        assert_eq!(default_currency(&legacy_only), Some("USD".to_owned()));
        assert_eq!(
            default_currency(&modern_only),
            default_currency(&legacy_only)
        );
        assert_eq!(default_currency(&both), Some("USD".to_owned()));
    }

    #[test]
    fn test_modern_field_takes_precedence() {
        let mixed = locale(Some("EUR"), Some("USD"));
        assert_eq!(default_currency(&mixed), Some("EUR".to_owned()));
    }

    #[test]
    fn test_unknown_locale_resolves_to_none() {
        assert_eq!(default_currency(&LocaleContext::default()), None);
    }
}
