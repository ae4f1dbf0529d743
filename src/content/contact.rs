//! Contact message templates
//!
//! Maps a contact action to the email header and body lines shown to the
//! visitor. Pure and total: an unknown action yields the base header and an
//! empty body, which callers read as "no template".

use serde::Serialize;
use std::str::FromStr;

/// First header line of every contact message
pub const CONTACT_HEADER: &str = "Send an email to webmaster.pasag@yahoo.com";

/// Reasons a visitor may contact the webmaster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    Suggest,
    Add,
    Remove,
}

impl FromStr for ContactAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suggest" => Ok(ContactAction::Suggest),
            "add" => Ok(ContactAction::Add),
            "remove" => Ok(ContactAction::Remove),
            other => Err(format!("Unknown contact action: {}", other)),
        }
    }
}

impl ContactAction {
    fn subject(self) -> &'static str {
        match self {
            ContactAction::Suggest => "Subject: Suggestion and Recommendations",
            ContactAction::Add => "Subject: Add a Member",
            ContactAction::Remove => "Subject: Remove a Member",
        }
    }

    fn body(self) -> &'static [&'static str] {
        match self {
            ContactAction::Suggest => {
                &["Include any comments or suggestions to improve our family tree. Thank you"]
            }
            ContactAction::Add => &[
                "Full name (including maiden name)",
                "Great grandparents full names (if known)",
                "Grandparents full names (if known)",
                "Parents full names",
                "Location",
                "Birth year",
                "Death year (if applicable)",
                "Spouse name (if applicable)",
                "Spouse birth year (if applicable)",
                "Spouse death year (if applicable)",
            ],
            ContactAction::Remove => {
                &["State only the full name of the member to be removed. Thank You"]
            }
        }
    }
}

/// Header and body lines of a contact email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub header: Vec<String>,
    pub body: Vec<String>,
}

impl ContactMessage {
    /// Build the message for a known action, or the bare header for `None`
    pub fn for_action(action: Option<ContactAction>) -> Self {
        let mut header = vec![CONTACT_HEADER.to_string()];
        let mut body = Vec::new();

        if let Some(action) = action {
            header.push(action.subject().to_string());
            body = action.body().iter().map(|line| line.to_string()).collect();
        }

        Self { header, body }
    }

    /// True when there is no template for the requested action
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Generate the contact message for an action name
pub fn contact_message(action: &str) -> ContactMessage {
    ContactMessage::for_action(action.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_template() {
        let msg = contact_message("remove");
        assert_eq!(msg.header, vec![CONTACT_HEADER, "Subject: Remove a Member"]);
        assert_eq!(msg.body.len(), 1);
        assert!(msg.body[0].contains("only the full name"));
    }

    #[test]
    fn test_add_template() {
        let msg = contact_message("add");
        assert_eq!(msg.header[1], "Subject: Add a Member");
        assert_eq!(msg.body.len(), 10);
        assert_eq!(msg.body[0], "Full name (including maiden name)");
    }

    #[test]
    fn test_suggest_template() {
        let msg = contact_message("suggest");
        assert_eq!(msg.header[1], "Subject: Suggestion and Recommendations");
        assert_eq!(msg.body.len(), 1);
    }

    #[test]
    fn test_unknown_action() {
        let msg = contact_message("unknown");
        assert_eq!(msg.header, vec![CONTACT_HEADER]);
        assert!(msg.body.is_empty());
        assert!(msg.is_empty());

        // Names are case sensitive
        assert!(contact_message("Remove").is_empty());
    }
}
