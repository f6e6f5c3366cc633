//! Channel and socket id validation.
//!
//! Channel names are restricted to `[-a-zA-Z0-9_=@,.;]` and a single trigger
//! may target at most [`MAX_CHANNELS`] of them.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::PousserError;

/// Maximum number of channels a single trigger may target.
pub const MAX_CHANNELS: usize = 100;

const CHANNEL_NAME_PATTERN: &str = r"^[-a-zA-Z0-9_=@,.;]+$";
const SOCKET_ID_PATTERN: &str = r"^[0-9]+\.[0-9]+$";

fn channel_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CHANNEL_NAME_PATTERN).expect("channel name pattern compiles"))
}

fn socket_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SOCKET_ID_PATTERN).expect("socket id pattern compiles"))
}

/// Validate a single channel name.
///
/// # Errors
///
/// Returns [`PousserError::InvalidChannelName`] if the name is empty or
/// contains a disallowed character.
pub fn validate_channel(name: &str) -> Result<(), PousserError> {
    if channel_name_regex().is_match(name) {
        Ok(())
    } else {
        Err(PousserError::InvalidChannelName(name.to_string()))
    }
}

/// Validate a channel list for a single trigger.
///
/// The count is checked before any name, and the first invalid name wins.
///
/// # Errors
///
/// Returns [`PousserError::TooManyChannels`] for more than [`MAX_CHANNELS`]
/// entries, otherwise the first [`PousserError::InvalidChannelName`].
pub fn validate_channels<S: AsRef<str>>(names: &[S]) -> Result<(), PousserError> {
    if names.len() > MAX_CHANNELS {
        return Err(PousserError::TooManyChannels(names.len()));
    }
    names.iter().try_for_each(|name| validate_channel(name.as_ref()))
}

/// Validate a socket id (`<digits>.<digits>`, e.g. `1234.5678`).
///
/// # Errors
///
/// Returns [`PousserError::InvalidSocketId`] on any other format.
pub fn validate_socket_id(socket_id: &str) -> Result<(), PousserError> {
    if socket_id_regex().is_match(socket_id) {
        Ok(())
    } else {
        Err(PousserError::InvalidSocketId(socket_id.to_string()))
    }
}

/// One or more channel names.
///
/// Lets `trigger` take a single name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Channels(Vec<String>);

impl Channels {
    /// Channel names in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the names.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Channels {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Channels {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for Channels {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for Channels {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for Channels {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Channels {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[String]> for Channels {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Channels {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_channel_names() {
        for name in ["room1", "private-chat", "presence-lobby", "a_b=c@d,e.f;g", "-"] {
            assert!(validate_channel(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_channel_names() {
        for name in ["", "has space", "colon:room", "slash/room", "emoji😀", "tab\t", "new\nline", "star*"] {
            assert!(
                matches!(validate_channel(name), Err(PousserError::InvalidChannelName(_))),
                "{name:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_too_many_channels() {
        let names: Vec<String> = (0..=MAX_CHANNELS).map(|i| format!("ch{i}")).collect();
        assert!(matches!(
            validate_channels(&names),
            Err(PousserError::TooManyChannels(101))
        ));

        assert!(validate_channels(&names[..MAX_CHANNELS]).is_ok());
    }

    #[test]
    fn test_size_checked_before_names() {
        let mut names: Vec<String> = (0..150).map(|i| format!("ch{i}")).collect();
        names[0] = "bad name".to_string();
        assert!(matches!(
            validate_channels(&names),
            Err(PousserError::TooManyChannels(150))
        ));
    }

    #[test]
    fn test_first_invalid_name_reported() {
        let names = ["ok", "bad one", "bad two"];
        match validate_channels(&names) {
            Err(PousserError::InvalidChannelName(name)) => assert_eq!(name, "bad one"),
            other => panic!("Expected InvalidChannelName, got {:?}", other),
        }
    }

    #[test]
    fn test_socket_id_format() {
        assert!(validate_socket_id("1234.5678").is_ok());
        for bad in ["", "1234", "1234.", ".5678", "12a4.5678", "1.2.3", "1234.5678\n", "١٢.٣"] {
            assert!(
                matches!(validate_socket_id(bad), Err(PousserError::InvalidSocketId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_channels_conversions() {
        assert_eq!(Channels::from("a").as_slice(), ["a".to_string()]);
        assert_eq!(Channels::from(["a", "b"]).len(), 2);
        assert_eq!(Channels::from(vec!["a".to_string()]).into_vec(), vec!["a"]);
        assert!(Channels::default().is_empty());
    }
}
