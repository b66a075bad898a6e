//! Company profile loaded from environment variables.
//!
//! The profile only feeds the invoice header and money formatting. Both values are
//! optional and fall back to defaults.

const DEFAULT_COMPANY_NAME: &str = "Crate Distribution";
const DEFAULT_CURRENCY_SYMBOL: &str = "DA";

/// Identity printed on trip invoices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    /// Company name for the invoice header
    pub name: String,
    /// Currency symbol appended to amounts
    pub currency_symbol: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMPANY_NAME.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl CompanyProfile {
    /// Reads `COMPANY_NAME` and `CURRENCY_SYMBOL`, ignoring blank values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: non_blank_var("COMPANY_NAME").unwrap_or(defaults.name),
            currency_symbol: non_blank_var("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
        }
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = CompanyProfile::default();
        assert_eq!(profile.name, "Crate Distribution");
        assert_eq!(profile.currency_symbol, "DA");
    }

    #[test]
    fn test_unset_variable_is_none() {
        assert_eq!(non_blank_var("TOURNEE_DESK_SURELY_UNSET_VARIABLE"), None);
    }
}
