use services::{AccountSession, auth::MIN_PASSWORD_LEN};

/// Sign-in form on the account screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountFormVm {
    pub email: String,
    pub password: String,
    pub busy: bool,
}

impl AccountFormVm {
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.busy
            && self.email.contains('@')
            && self.password.chars().count() >= MIN_PASSWORD_LEN
    }

    /// Keep the email after a failed attempt; the password is cleared.
    pub fn reset_after_attempt(&mut self) {
        self.password.clear();
        self.busy = false;
    }
}

/// Status line for the signed-in account.
#[must_use]
pub fn account_label(session: Option<&AccountSession>) -> String {
    match session {
        Some(session) => format!("Signed in as {}", session.display_name()),
        None => "Playing as a guest on this device".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_needs_email_and_long_password() {
        let mut form = AccountFormVm {
            email: "ada@lovelace.dev".into(),
            password: "12345".into(),
            busy: false,
        };
        assert!(!form.can_submit());
        form.password.push('6');
        assert!(form.can_submit());
        form.busy = true;
        assert!(!form.can_submit());

        form.reset_after_attempt();
        assert_eq!(form.email, "ada@lovelace.dev");
        assert!(form.password.is_empty());
    }

    #[test]
    fn label_prefers_email() {
        let mut session = AccountSession::from_uid("uid-3".parse().unwrap());
        assert_eq!(account_label(Some(&session)), "Signed in as uid-3");
        session.email = Some("ada@lovelace.dev".into());
        assert_eq!(account_label(Some(&session)), "Signed in as ada@lovelace.dev");
        assert_eq!(account_label(None), "Playing as a guest on this device");
    }
}
