use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Correlates a background request with the foreground state it completes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(String);

impl Ticket {
    pub fn new() -> Self {
        Self(new_correlation_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_length() {
        let cid = new_correlation_id();
        assert_eq!(cid.len(), 8);
    }

    #[test]
    fn correlation_id_is_hex() {
        let cid = new_correlation_id();
        assert!(cid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ticket_display_matches_str() {
        let ticket = Ticket::new();
        assert_eq!(ticket.to_string(), ticket.as_str());
        assert_eq!(ticket.as_str().len(), 8);
    }

    #[test]
    fn ticket_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let t1 = Ticket::new();
        let t2 = t1.clone();
        set.insert(t1);
        set.insert(t2);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ticket_serialization() {
        let ticket = Ticket::new();
        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(ticket, back);
    }
}
