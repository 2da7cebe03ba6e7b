//! Data models for the Slack Web API.
//!
//! Field names follow the wire schema exactly. Optional fields are skipped
//! when serializing so that a decoded value re-encodes to the same shape.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A field whose JSON type has drifted across API revisions.
///
/// Strings decode as [`Loose::Text`], `null` or a missing key as
/// [`Loose::Absent`], and anything else is kept verbatim as
/// [`Loose::Opaque`] so nothing is lost and decoding never fails.
#[derive(Debug, Clone, Default)]
pub enum Loose {
    /// Not present, or `null`.
    #[default]
    Absent,
    /// A JSON string.
    Text(String),
    /// Any other JSON value, unparsed.
    Opaque(Box<RawValue>),
}

impl Loose {
    /// Whether the field was missing or `null`.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The string value, if this is [`Loose::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw JSON of an [`Loose::Opaque`] value.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Opaque(raw) => Some(raw.get()),
            _ => None,
        }
    }

    /// Read the value as an unsigned integer.
    ///
    /// Accepts both a JSON number and a numeric string, which is how counts
    /// such as `user_count` have been sent by different API revisions.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Absent => None,
            Self::Text(text) => text.trim().parse().ok(),
            Self::Opaque(raw) => raw.get().trim().parse().ok(),
        }
    }
}

impl PartialEq for Loose {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.get() == b.get(),
            _ => false,
        }
    }
}

impl fmt::Display for Loose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Opaque(raw) => f.write_str(raw.get()),
        }
    }
}

impl Serialize for Loose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Opaque(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Loose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Some(raw) = Option::<Box<RawValue>>::deserialize(deserializer)? else {
            return Ok(Self::Absent);
        };
        Ok(serde_json::from_str::<String>(raw.get()).map_or(Self::Opaque(raw), Self::Text))
    }
}

/// Decode `null` as the type's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A workspace member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID (e.g. `U024BE7LH`).
    pub id: String,
    /// Username.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether the account has been deactivated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted: bool,
    /// Hex color used for the name in clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Profile details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// Workspace admin.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    /// Workspace owner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_owner: bool,
    /// Two-factor authentication enabled.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_2fa: bool,
    /// Has uploaded files.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_files: bool,
}

impl User {
    /// First name from the profile, or an empty string.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.first_name.as_deref())
            .unwrap_or_default()
    }
}

/// Profile attached to a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Full display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Skype handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skype: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 24px avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_24: Option<String>,
    /// 32px avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_32: Option<String>,
    /// 48px avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_48: Option<String>,
    /// 72px avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_72: Option<String>,
    /// 192px avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_192: Option<String>,
}

/// A user group (`@handle` mention group).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserGroup {
    /// Group ID (e.g. `S0614TZR7`).
    pub id: String,
    /// Owning team ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_id: String,
    /// Always true for user groups.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_usergroup: bool,
    /// Friendly name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mention handle, without the `@`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,
    /// Shared from another workspace.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_external: bool,
    /// Creation time (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_create: Option<i64>,
    /// Last update time (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_update: Option<i64>,
    /// Deletion time (Unix seconds), `0` while the group is live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_delete: Option<i64>,
    /// Automatic membership type (`admin`, `owner`), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_type: Option<String>,
    /// Creator user ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last updater user ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Deleter; a user ID or an arbitrary structure depending on revision.
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub deleted_by: Loose,
    /// Default channels and groups.
    #[serde(default, deserialize_with = "null_as_default")]
    pub prefs: Prefs,
    /// Member user IDs, in server order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<String>,
    /// Member count, sent as a string or a number.
    #[serde(default, skip_serializing_if = "Loose::is_absent")]
    pub user_count: Loose,
}

impl UserGroup {
    /// Whether the group has been disabled.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.date_delete.is_some_and(|ts| ts > 0)
    }

    /// Member count as a number, from either wire shape.
    #[must_use]
    pub fn user_count(&self) -> Option<u64> {
        self.user_count.as_u64()
    }
}

/// Default channel and group preferences of a [`UserGroup`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prefs {
    /// Default channel IDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<Loose>>,
    /// Default private group IDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Loose>>,
}

/// Presence as returned by `users.getPresence`.
///
/// Every field is optional: a missing field was not reported, it is not
/// `false` or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// `active` or `away`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<String>,
    /// Has an open connection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
    /// Marked away by inactivity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_away: Option<bool>,
    /// Marked away by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_away: Option<bool>,
    /// Number of open connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_count: Option<u32>,
    /// Last activity (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
}

impl Presence {
    /// Whether the reported status is `active`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.presence.as_deref() == Some("active")
    }
}

/// A message attachment block, passed through as raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attachment(serde_json::Value);

impl Attachment {
    /// Wrap a JSON attachment object.
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The underlying JSON.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Attachment {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Payload posted to an incoming webhook.
///
/// Unset fields are omitted from the JSON body. `icon_url` and `icon_emoji`
/// are alternatives; the service decides which wins if both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Target channel override (`#general`, `@user`, or an ID).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Display name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Avatar emoji shortcode (e.g. `:ghost:`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    /// Unfurl links to text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    /// Unfurl links to media content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
    /// Link `@user` and `#channel` names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    /// Parse mode (`full` or `none`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    /// Attachment blocks, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl OutgoingMessage {
    /// A message with only `text` set.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the target channel.
    #[must_use]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the avatar image URL.
    #[must_use]
    pub fn icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    /// Set the avatar emoji.
    #[must_use]
    pub fn icon_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.icon_emoji = Some(emoji.into());
        self
    }

    /// Enable or disable text unfurling.
    #[must_use]
    pub const fn unfurl_links(mut self, enabled: bool) -> Self {
        self.unfurl_links = Some(enabled);
        self
    }

    /// Enable or disable media unfurling.
    #[must_use]
    pub const fn unfurl_media(mut self, enabled: bool) -> Self {
        self.unfurl_media = Some(enabled);
        self
    }

    /// Enable or disable name linking.
    #[must_use]
    pub const fn link_names(mut self, enabled: bool) -> Self {
        self.link_names = Some(enabled);
        self
    }

    /// Set the parse mode.
    #[must_use]
    pub fn parse(mut self, mode: impl Into<String>) -> Self {
        self.parse = Some(mode.into());
        self
    }

    /// Append an attachment.
    #[must_use]
    pub fn attachment(mut self, attachment: impl Into<Attachment>) -> Self {
        self.attachments.push(attachment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_round_trip() {
        let body = r#"{
            "id": "U1",
            "name": "alice",
            "deleted": false,
            "color": "9f69e7",
            "profile": {"first_name": "Alice", "email": "alice@example.com", "image_24": "https://a/24.png"},
            "is_admin": true,
            "has_2fa": true
        }"#;
        let user: User = serde_json::from_str(body).expect("user should decode");
        assert_eq!(user.id, "U1");
        assert_eq!(user.name, "alice");
        assert!(user.is_admin);
        assert!(!user.is_owner);
        assert_eq!(user.first_name(), "Alice");

        let encoded = serde_json::to_string(&user).expect("user should encode");
        let again: User = serde_json::from_str(&encoded).expect("user should decode again");
        assert_eq!(user, again);
    }

    #[test]
    fn test_user_without_profile_has_empty_first_name() {
        let user: User = serde_json::from_str(r#"{"id":"U2","name":"bot"}"#).expect("decode");
        assert_eq!(user.first_name(), "");
        assert!(user.profile.is_none());
    }

    #[test]
    fn test_loose_decodes_every_shape() {
        let values: Vec<Loose> =
            serde_json::from_str(r#"["C1", null, 42, {"id": "C2"}, ["x"]]"#).expect("decode");
        assert_eq!(values[0].as_text(), Some("C1"));
        assert!(values[1].is_absent());
        assert_eq!(values[2].raw(), Some("42"));
        assert_eq!(values[3].raw(), Some(r#"{"id": "C2"}"#));
        assert_eq!(values[4].raw(), Some(r#"["x"]"#));
    }

    #[test]
    fn test_loose_as_u64_reads_string_and_number() {
        let group_a: UserGroup =
            serde_json::from_str(r#"{"id":"S1","user_count":"3"}"#).expect("decode");
        let group_b: UserGroup =
            serde_json::from_str(r#"{"id":"S2","user_count":3}"#).expect("decode");
        let group_c: UserGroup = serde_json::from_str(r#"{"id":"S3"}"#).expect("decode");
        assert_eq!(group_a.user_count(), Some(3));
        assert_eq!(group_b.user_count(), Some(3));
        assert_eq!(group_c.user_count(), None);
    }

    #[test]
    fn test_usergroup_tolerates_schema_drift() {
        let body = r#"{
            "id": "S0614TZR7",
            "team_id": "T060RNRCH",
            "is_usergroup": true,
            "name": "Team Admins",
            "description": "A group of all Administrators on your team.",
            "handle": "admins",
            "is_external": false,
            "date_create": 1446598059,
            "date_update": 1446670362,
            "date_delete": 0,
            "auto_type": "admin",
            "created_by": "USLACKBOT",
            "updated_by": "U060RNRCZ",
            "deleted_by": {"id": "U1", "reason": null},
            "prefs": {"channels": ["C1", {"id": "C2"}], "groups": []},
            "users": ["U060RNRCZ", "U060ULRC0"],
            "user_count": "2"
        }"#;
        let group: UserGroup = serde_json::from_str(body).expect("group should decode");
        assert_eq!(group.handle, "admins");
        assert!(!group.is_deleted());
        assert_eq!(group.users.len(), 2);
        assert!(group.deleted_by.raw().is_some());
        let channels = group.prefs.channels.as_deref().expect("channels present");
        assert_eq!(channels[0].as_text(), Some("C1"));
        assert!(channels[1].raw().is_some());
        assert_eq!(group.prefs.groups.as_deref().map(<[Loose]>::len), Some(0));

        let encoded = serde_json::to_string(&group).expect("group should encode");
        let again: UserGroup = serde_json::from_str(&encoded).expect("group should decode again");
        assert_eq!(group, again);
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let users: Vec<User> = serde_json::from_str(
            r#"[
                {"id":"U1","name":null,"deleted":null,"is_admin":null,"has_2fa":null},
                {"id":"U2","name":"bob","deleted":true}
            ]"#,
        )
        .expect("decode");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "");
        assert!(!users[0].deleted);
        assert!(!users[0].is_admin);
        assert_eq!(users[1].name, "bob");

        let group: UserGroup = serde_json::from_str(
            r#"{"id":"S1","team_id":null,"name":null,"handle":null,
                "is_external":null,"prefs":null,"users":null}"#,
        )
        .expect("decode");
        assert_eq!(group.team_id, "");
        assert_eq!(group.handle, "");
        assert!(group.users.is_empty());
        assert_eq!(group.prefs, Prefs::default());
    }

    #[test]
    fn test_usergroup_null_prefs_lists_are_absent() {
        let group: UserGroup = serde_json::from_str(
            r#"{"id":"S1","deleted_by":null,"prefs":{"channels":null}}"#,
        )
        .expect("decode");
        assert!(group.deleted_by.is_absent());
        assert!(group.prefs.channels.is_none());
        assert!(group.prefs.groups.is_none());
    }

    #[test]
    fn test_presence_absent_fields_stay_unreported() {
        let presence: Presence =
            serde_json::from_str(r#"{"ok":true,"presence":"active"}"#).expect("decode");
        assert!(presence.is_active());
        assert_eq!(presence.online, None);
        assert_eq!(presence.connection_count, None);
    }

    #[test]
    fn test_outgoing_text_only_serializes_text() {
        let message = OutgoingMessage::text("hello");
        let value = serde_json::to_value(&message).expect("encode");
        assert_eq!(value, json!({"text": "hello"}));
    }

    #[test]
    fn test_outgoing_builder_sets_wire_names() {
        let message = OutgoingMessage::text("deploy done")
            .channel("#ops")
            .username("deploybot")
            .icon_emoji(":rocket:")
            .unfurl_links(false)
            .link_names(true)
            .parse("full")
            .attachment(json!({"fallback": "build 42", "color": "good"}));
        let value = serde_json::to_value(&message).expect("encode");
        assert_eq!(
            value,
            json!({
                "text": "deploy done",
                "channel": "#ops",
                "username": "deploybot",
                "icon_emoji": ":rocket:",
                "unfurl_links": false,
                "link_names": true,
                "parse": "full",
                "attachments": [{"fallback": "build 42", "color": "good"}]
            })
        );
    }
}
