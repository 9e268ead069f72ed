use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub remember_me: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn remember(&self) -> bool {
        is_truthy(self.remember_me.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Checkbox-style truthiness for a raw form value.
///
/// Absent and empty are false, as are the usual spelled-out negatives.
/// Anything else, including the browser's default `on`, is true.
#[must_use]
pub fn is_truthy(value: Option<&str>) -> bool {
    let Some(raw) = value else {
        return false;
    };

    let normalized = raw.trim().to_ascii_lowercase();
    !matches!(normalized.as_str(), "" | "0" | "false" | "off" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy(Some("on")));
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("yes")));
        assert!(is_truthy(Some("remember")));
    }

    #[test]
    fn test_falsy_values() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(Some("   ")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("FALSE")));
        assert!(!is_truthy(Some(" off ")));
        assert!(!is_truthy(Some("No")));
    }

    #[test]
    fn test_login_form_remember() {
        let form = LoginForm {
            remember_me: Some("on".to_string()),
            ..LoginForm::default()
        };
        assert!(form.remember());
        assert!(!LoginForm::default().remember());
    }
}
