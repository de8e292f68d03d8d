use serde::Deserialize;

pub const UNKNOWN_PLAYER: &str = "Unknown Player";
pub const UNKNOWN_PARENT: &str = "Unknown Parent";

const DEFAULT_TEAM_NAME: &str = "Unknown Team";
const DEFAULT_AGE_GROUP: &str = "Unknown Age Group";
const DEFAULT_PARENT_TEL: &str = "Unknown Phone";
const DEFAULT_MANAGER_NAME: &str = "Team Manager";
const DEFAULT_MANAGER_TEL: &str = "Not provided";
const DEFAULT_SEASON: &str = "2025-26";
const DEFAULT_MEMBERSHIP_FEE: &str = "40";
const DEFAULT_SUBSCRIPTION_FEE: &str = "26";

/// Parsed trigger body. Every field is optional on the wire; accessors
/// substitute the documented default when a field is absent or empty.
/// Parsing fails only on structurally invalid JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationPayload {
    pub player_first_name: Option<String>,
    pub player_last_name: Option<String>,
    pub parent_first_name: Option<String>,
    pub parent_last_name: Option<String>,
    pub parent_tel: Option<String>,
    pub team_name: Option<String>,
    pub age_group: Option<String>,
    pub team_manager_1_full_name: Option<String>,
    pub team_manager_1_tel: Option<String>,
    pub current_registration_season: Option<String>,
    pub membership_fee_amount: Option<String>,
    pub subscription_fee_amount: Option<String>,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

fn full_name(first: &Option<String>, last: &Option<String>, sentinel: &str) -> String {
    let joined = format!(
        "{} {}",
        first.as_deref().unwrap_or(""),
        last.as_deref().unwrap_or("")
    );
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        sentinel.to_string()
    } else {
        trimmed.to_string()
    }
}

impl RegistrationPayload {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Raw first-name parts feed the template without defaults; the
    /// provider-side template tolerates empty slots.
    pub fn player_first_name(&self) -> &str {
        self.player_first_name.as_deref().unwrap_or("")
    }

    pub fn parent_first_name(&self) -> &str {
        self.parent_first_name.as_deref().unwrap_or("")
    }

    pub fn player_full_name(&self) -> String {
        full_name(&self.player_first_name, &self.player_last_name, UNKNOWN_PLAYER)
    }

    pub fn parent_full_name(&self) -> String {
        full_name(&self.parent_first_name, &self.parent_last_name, UNKNOWN_PARENT)
    }

    pub fn parent_tel(&self) -> &str {
        or_default(&self.parent_tel, DEFAULT_PARENT_TEL)
    }

    pub fn team_name(&self) -> &str {
        or_default(&self.team_name, DEFAULT_TEAM_NAME)
    }

    pub fn age_group(&self) -> &str {
        or_default(&self.age_group, DEFAULT_AGE_GROUP)
    }

    pub fn manager_full_name(&self) -> &str {
        or_default(&self.team_manager_1_full_name, DEFAULT_MANAGER_NAME)
    }

    pub fn manager_tel(&self) -> &str {
        or_default(&self.team_manager_1_tel, DEFAULT_MANAGER_TEL)
    }

    pub fn season(&self) -> &str {
        or_default(&self.current_registration_season, DEFAULT_SEASON)
    }

    pub fn membership_fee(&self) -> &str {
        or_default(&self.membership_fee_amount, DEFAULT_MEMBERSHIP_FEE)
    }

    pub fn subscription_fee(&self) -> &str {
        or_default(&self.subscription_fee_amount, DEFAULT_SUBSCRIPTION_FEE)
    }

    /// "{team_name} {age_group}" label used in responses and logs
    pub fn team_label(&self) -> String {
        format!("{} {}", self.team_name(), self.age_group())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gets_all_defaults() {
        let payload = RegistrationPayload::parse("{}").unwrap();

        assert_eq!(payload.player_full_name(), UNKNOWN_PLAYER);
        assert_eq!(payload.parent_full_name(), UNKNOWN_PARENT);
        assert_eq!(payload.parent_tel(), "Unknown Phone");
        assert_eq!(payload.team_name(), "Unknown Team");
        assert_eq!(payload.age_group(), "Unknown Age Group");
        assert_eq!(payload.manager_full_name(), "Team Manager");
        assert_eq!(payload.manager_tel(), "Not provided");
        assert_eq!(payload.season(), "2025-26");
        assert_eq!(payload.membership_fee(), "40");
        assert_eq!(payload.subscription_fee(), "26");
    }

    #[test]
    fn test_empty_strings_fall_back_to_defaults() {
        let payload =
            RegistrationPayload::parse(r#"{"team_name":"","parent_tel":""}"#).unwrap();

        assert_eq!(payload.team_name(), "Unknown Team");
        assert_eq!(payload.parent_tel(), "Unknown Phone");
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let payload = RegistrationPayload::parse(r#"{"player_first_name":"Seb"}"#).unwrap();
        assert_eq!(payload.player_full_name(), "Seb");

        let payload = RegistrationPayload::parse(r#"{"player_last_name":"Dring"}"#).unwrap();
        assert_eq!(payload.player_full_name(), "Dring");

        let payload = RegistrationPayload::parse(
            r#"{"player_first_name":"Seb","player_last_name":"Dring"}"#,
        )
        .unwrap();
        assert_eq!(payload.player_full_name(), "Seb Dring");
    }

    #[test]
    fn test_team_label() {
        let payload = RegistrationPayload::parse(
            r#"{"team_name":"Panthers","age_group":"u11s"}"#,
        )
        .unwrap();
        assert_eq!(payload.team_label(), "Panthers u11s");
    }

    #[test]
    fn test_structurally_invalid_json_fails() {
        assert!(RegistrationPayload::parse("not json").is_err());
        assert!(RegistrationPayload::parse("[1,2]").is_err());
    }
}
