use std::collections::BTreeMap;

use serde::Serialize;

use super::RegistrationPayload;

/// Number of positional slots in the provider-side registration template.
pub const TEMPLATE_VARIABLE_COUNT: usize = 9;

/// Ordered template-variable mapping for the outbound message. Keys are the
/// fixed strings "1".."9", positionally bound to the template layout:
/// parent first name, player first name, team name, age group, season,
/// membership fee, subscription fee, manager name, manager phone.
///
/// Every key is always present; values may be empty strings (slots "1" and
/// "2" carry the raw name parts without defaults).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateVariables(BTreeMap<String, String>);

impl TemplateVariables {
    pub fn from_registration(payload: &RegistrationPayload) -> Self {
        let entries = [
            ("1", payload.parent_first_name().to_string()),
            ("2", payload.player_first_name().to_string()),
            ("3", payload.team_name().to_string()),
            ("4", payload.age_group().to_string()),
            ("5", payload.season().to_string()),
            ("6", payload.membership_fee().to_string()),
            ("7", payload.subscription_fee().to_string()),
            ("8", payload.manager_full_name().to_string()),
            ("9", payload.manager_tel().to_string()),
        ];
        Self(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object form expected by the provider's content API
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}
