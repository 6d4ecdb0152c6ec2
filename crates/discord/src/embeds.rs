use serde::Serialize;

pub const EMBED_TITLE_LIMIT: usize = 256;
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;
pub const EMBED_FIELD_NAME_LIMIT: usize = 256;
pub const EMBED_FIELD_VALUE_LIMIT: usize = 1024;

/// Discord rejects empty field values; a zero-width space renders as blank.
pub const BLANK_FIELD_VALUE: &str = "\u{200b}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmbedColor(pub u32);

impl EmbedColor {
    pub const GREEN: Self = Self(0x00FF00);
    pub const YELLOW: Self = Self(0xFFFF00);
    pub const RED: Self = Self(0xFF0000);
    pub const WHITE: Self = Self(0xFFFFFF);

    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<EmbedColor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Body of a `POST /channels/{channel.id}/messages` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl MessageTemplate {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), embeds: Vec::new() }
    }

    /// Plain-text rendering used in logs and terminals.
    pub fn fallback_text(&self) -> String {
        if let Some(content) = &self.content {
            return content.clone();
        }
        self.embeds.iter().find_map(|embed| embed.title.clone()).unwrap_or_default()
    }
}

pub struct MessageBuilder {
    embeds: Vec<Embed>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self { embeds: Vec::new() }
    }

    pub fn embed<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut EmbedBuilder),
    {
        let mut builder = EmbedBuilder::default();
        build(&mut builder);
        self.embeds.push(builder.build());
        self
    }

    pub fn build(self) -> MessageTemplate {
        MessageTemplate { content: None, embeds: self.embeds }
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct EmbedBuilder {
    embed: Embed,
}

impl EmbedBuilder {
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.embed.title = Some(clamp_chars(title.into(), EMBED_TITLE_LIMIT));
        self
    }

    pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
        self.embed.url = Some(url.into());
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.embed.description = Some(clamp_chars(description.into(), EMBED_DESCRIPTION_LIMIT));
        self
    }

    pub fn color(&mut self, color: EmbedColor) -> &mut Self {
        self.embed.color = Some(color);
        self
    }

    pub fn field(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push_field(name.into(), value.into(), false)
    }

    pub fn inline_field(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push_field(name.into(), value.into(), true)
    }

    fn push_field(&mut self, name: String, value: String, inline: bool) -> &mut Self {
        let value = if value.trim().is_empty() {
            BLANK_FIELD_VALUE.to_owned()
        } else {
            clamp_chars(value, EMBED_FIELD_VALUE_LIMIT)
        };
        self.embed.fields.push(EmbedField {
            name: clamp_chars(name, EMBED_FIELD_NAME_LIMIT),
            value,
            inline,
        });
        self
    }

    fn build(self) -> Embed {
        self.embed
    }
}

fn clamp_chars(value: String, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((cut, _)) => value[..cut].to_owned(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EmbedColor, MessageBuilder, MessageTemplate, BLANK_FIELD_VALUE, EMBED_FIELD_VALUE_LIMIT,
        EMBED_TITLE_LIMIT,
    };

    #[test]
    fn message_builder_creates_typed_embed_structure() {
        let message = MessageBuilder::new()
            .embed(|embed| {
                embed
                    .title("Two Sum")
                    .url("https://leetcode.com/problems/two-sum/description/")
                    .color(EmbedColor::GREEN)
                    .inline_field("Difficulty", "Easy")
                    .field("Tags", "Array, Hash Table");
            })
            .build();

        assert_eq!(message.embeds.len(), 1);
        let embed = &message.embeds[0];
        assert_eq!(embed.title.as_deref(), Some("Two Sum"));
        assert_eq!(embed.fields.len(), 2);
        assert!(embed.fields[0].inline);
        assert!(!embed.fields[1].inline);
        assert_eq!(message.fallback_text(), "Two Sum");
    }

    #[test]
    fn serialized_message_matches_discord_shape() {
        let message = MessageBuilder::new()
            .embed(|embed| {
                embed
                    .title("Median of Two Sorted Arrays")
                    .color(EmbedColor::RED)
                    .inline_field("Likes", "10");
            })
            .build();

        let json = serde_json::to_value(&message).expect("message should serialize");

        assert!(json.get("content").is_none());
        assert_eq!(json["embeds"][0]["color"], 0xFF0000);
        assert_eq!(json["embeds"][0]["fields"][0]["inline"], true);
        assert!(json["embeds"][0].get("url").is_none());
    }

    #[test]
    fn empty_field_values_are_replaced_with_blank_marker() {
        let message = MessageBuilder::new()
            .embed(|embed| {
                embed.field("Tags", "");
            })
            .build();

        assert_eq!(message.embeds[0].fields[0].value, BLANK_FIELD_VALUE);
    }

    #[test]
    fn oversized_values_are_clamped_on_char_boundaries() {
        let long_title = "題".repeat(EMBED_TITLE_LIMIT + 10);
        let long_value = "x".repeat(EMBED_FIELD_VALUE_LIMIT * 2);
        let message = MessageBuilder::new()
            .embed(|embed| {
                embed.title(long_title).field("Body", long_value);
            })
            .build();

        let embed = &message.embeds[0];
        let title_len = embed.title.as_deref().map(|title| title.chars().count());
        assert_eq!(title_len, Some(EMBED_TITLE_LIMIT));
        assert_eq!(embed.fields[0].value.chars().count(), EMBED_FIELD_VALUE_LIMIT);
    }

    #[test]
    fn text_message_has_no_embeds() {
        let message = MessageTemplate::text("hello");
        let json = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(json["content"], "hello");
        assert!(json.get("embeds").is_none());
        assert_eq!(message.fallback_text(), "hello");
    }
}
