//! Turns a draw outcome into the chat message posted back to the channel.

use leetdraw_core::{Difficulty, DisplayRecord, DrawError, APOLOGY_MESSAGE};

use crate::embeds::{EmbedColor, MessageBuilder, MessageTemplate};

/// Maximum number of characters of question body shown in a card.
pub const CONTENT_EXCERPT_BUDGET: usize = 500;
pub const EXCERPT_SUFFIX: &str = "...";
pub const CARD_TITLE_PREFIX: &str = "LeetCode 隨機抽題：";

pub const FIELD_DIFFICULTY: &str = "難度";
pub const FIELD_PAID_ONLY: &str = "是否付費題";
pub const FIELD_LIKES: &str = "喜歡";
pub const FIELD_DISLIKES: &str = "不喜歡";
pub const FIELD_TAGS: &str = "Tags";
pub const FIELD_CONTENT: &str = "題目內容";

pub fn color_for(difficulty: &Difficulty) -> EmbedColor {
    match difficulty {
        Difficulty::Easy => EmbedColor::GREEN,
        Difficulty::Medium => EmbedColor::YELLOW,
        Difficulty::Hard => EmbedColor::RED,
        Difficulty::Unknown(_) => EmbedColor::WHITE,
    }
}

/// Cuts `text` to `budget` characters and appends `...` when anything was dropped.
pub fn truncate_excerpt(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{EXCERPT_SUFFIX}", &text[..cut]),
        None => text.to_owned(),
    }
}

pub fn paid_label(is_paid_only: bool) -> &'static str {
    if is_paid_only {
        "是"
    } else {
        "否"
    }
}

pub fn question_card(record: &DisplayRecord) -> MessageTemplate {
    let excerpt =
        truncate_excerpt(record.content.as_deref().unwrap_or_default(), CONTENT_EXCERPT_BUDGET);

    MessageBuilder::new()
        .embed(|embed| {
            embed
                .title(format!("{CARD_TITLE_PREFIX}{}", record.title))
                .url(record.question_url.clone())
                .description(format!("ID: {}", record.id))
                .color(color_for(&record.difficulty))
                .inline_field(FIELD_DIFFICULTY, record.difficulty.label())
                .inline_field(FIELD_PAID_ONLY, paid_label(record.is_paid_only))
                .inline_field(FIELD_LIKES, record.likes.to_string())
                .inline_field(FIELD_DISLIKES, record.dislikes.to_string())
                .field(FIELD_TAGS, record.tags.clone())
                .field(FIELD_CONTENT, excerpt);
        })
        .build()
}

pub fn apology_message() -> MessageTemplate {
    MessageTemplate::text(APOLOGY_MESSAGE)
}

pub fn render_draw(result: &Result<DisplayRecord, DrawError>) -> MessageTemplate {
    match result {
        Ok(record) => question_card(record),
        Err(error) => MessageTemplate::text(error.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use leetdraw_core::{
        Difficulty, DisplayRecord, DrawError, FetchError, QuestionDetail, QuestionSelector,
        QuestionSlug, QuestionSource, TopicTag, APOLOGY_MESSAGE,
    };

    use super::{
        apology_message, color_for, question_card, render_draw, truncate_excerpt,
        CONTENT_EXCERPT_BUDGET, FIELD_CONTENT, FIELD_DIFFICULTY, FIELD_PAID_ONLY, FIELD_TAGS,
    };
    use crate::embeds::{EmbedColor, BLANK_FIELD_VALUE};

    struct SingleQuestionSource {
        slugs: Vec<QuestionSlug>,
        detail: QuestionDetail,
    }

    #[async_trait]
    impl QuestionSource for SingleQuestionSource {
        async fn list_slugs(&self) -> Result<Vec<QuestionSlug>, FetchError> {
            Ok(self.slugs.clone())
        }

        async fn question_detail(&self, slug: &QuestionSlug) -> Result<QuestionDetail, FetchError> {
            if slug == &self.detail.slug {
                Ok(self.detail.clone())
            } else {
                Err(FetchError::NotFound { slug: slug.to_string() })
            }
        }
    }

    fn hard_detail() -> QuestionDetail {
        QuestionDetail {
            id: "42".to_owned(),
            frontend_id: "42".to_owned(),
            title: "Trapping Rain Water".to_owned(),
            slug: QuestionSlug::new("trapping-rain-water"),
            raw_content: Some(
                "<p>Given <code>n</code> non-negative integers&nbsp;...</p>".to_owned(),
            ),
            is_paid_only: false,
            difficulty: Difficulty::Hard,
            likes: 30_000,
            dislikes: 400,
            tags: vec![
                TopicTag { name: "Array".to_owned(), slug: "array".to_owned() },
                TopicTag { name: "Two Pointers".to_owned(), slug: "two-pointers".to_owned() },
            ],
        }
    }

    fn record(difficulty: Difficulty, content: Option<&str>) -> DisplayRecord {
        DisplayRecord {
            id: "1".to_owned(),
            title: "Two Sum".to_owned(),
            slug: QuestionSlug::new("two-sum"),
            content: content.map(str::to_owned),
            is_paid_only: true,
            difficulty,
            likes: 10,
            dislikes: 2,
            tags: String::new(),
            question_url: "https://leetcode.com/problems/two-sum/description/".to_owned(),
        }
    }

    #[test]
    fn colors_follow_difficulty() {
        assert_eq!(color_for(&Difficulty::Easy).value(), 0x00FF00);
        assert_eq!(color_for(&Difficulty::Medium).value(), 0xFFFF00);
        assert_eq!(color_for(&Difficulty::Hard).value(), 0xFF0000);
        assert_eq!(color_for(&Difficulty::Unknown("Legendary".to_owned())).value(), 0xFFFFFF);
        assert_eq!(color_for(&Difficulty::Unknown(String::new())), EmbedColor::WHITE);
    }

    #[test]
    fn excerpt_at_or_under_budget_is_unchanged() {
        let exact = "a".repeat(CONTENT_EXCERPT_BUDGET);
        assert_eq!(truncate_excerpt(&exact, CONTENT_EXCERPT_BUDGET), exact);
        assert_eq!(truncate_excerpt("short", CONTENT_EXCERPT_BUDGET), "short");
        assert_eq!(truncate_excerpt("", CONTENT_EXCERPT_BUDGET), "");
    }

    #[test]
    fn excerpt_over_budget_is_cut_and_suffixed() {
        let long = "b".repeat(CONTENT_EXCERPT_BUDGET + 1);
        let excerpt = truncate_excerpt(&long, CONTENT_EXCERPT_BUDGET);

        assert_eq!(excerpt.chars().count(), CONTENT_EXCERPT_BUDGET + 3);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.starts_with(&"b".repeat(CONTENT_EXCERPT_BUDGET)));
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let text = "給定一個整數陣列";
        assert_eq!(truncate_excerpt(text, 4), "給定一個...");
    }

    #[test]
    fn card_lays_out_fields_in_display_order() {
        let message = question_card(&record(Difficulty::Easy, None));

        assert!(message.content.is_none());
        let embed = &message.embeds[0];
        assert_eq!(embed.title.as_deref(), Some("LeetCode 隨機抽題：Two Sum"));
        assert_eq!(embed.description.as_deref(), Some("ID: 1"));
        assert_eq!(
            embed.url.as_deref(),
            Some("https://leetcode.com/problems/two-sum/description/")
        );

        let names: Vec<&str> = embed.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["難度", "是否付費題", "喜歡", "不喜歡", "Tags", "題目內容"]);
        let inline: Vec<bool> = embed.fields.iter().map(|field| field.inline).collect();
        assert_eq!(inline, vec![true, true, true, true, false, false]);

        assert_eq!(embed.field(FIELD_PAID_ONLY).map(|f| f.value.as_str()), Some("是"));
        assert_eq!(embed.field(FIELD_TAGS).map(|f| f.value.as_str()), Some(BLANK_FIELD_VALUE));
        assert_eq!(embed.field(FIELD_CONTENT).map(|f| f.value.as_str()), Some(BLANK_FIELD_VALUE));
    }

    #[test]
    fn card_truncates_long_content() {
        let body = "x".repeat(CONTENT_EXCERPT_BUDGET * 2);
        let message = question_card(&record(Difficulty::Medium, Some(&body)));

        let content = message.embeds[0].field(FIELD_CONTENT).map(|f| f.value.clone());
        assert_eq!(content, Some(format!("{}...", "x".repeat(CONTENT_EXCERPT_BUDGET))));
    }

    #[test]
    fn unknown_difficulty_label_is_displayed_verbatim() {
        let message = question_card(&record(Difficulty::Unknown("Legendary".to_owned()), None));
        let embed = &message.embeds[0];

        assert_eq!(embed.color, Some(EmbedColor::WHITE));
        assert_eq!(embed.field(FIELD_DIFFICULTY).map(|f| f.value.as_str()), Some("Legendary"));
    }

    #[test]
    fn render_draw_maps_every_error_to_apology() {
        let errors = [
            DrawError::EmptyCatalog,
            DrawError::Catalog(FetchError::InvalidSlug),
            DrawError::Detail(FetchError::NotFound { slug: "gone".to_owned() }),
        ];
        for error in errors {
            assert_eq!(render_draw(&Err(error)), apology_message());
        }
        assert_eq!(apology_message().content.as_deref(), Some(APOLOGY_MESSAGE));
    }

    #[tokio::test]
    async fn single_hard_question_renders_red_unpaid_card() {
        let detail = hard_detail();
        let source = SingleQuestionSource { slugs: vec![detail.slug.clone()], detail };
        let selector = QuestionSelector::new(source);

        let message = render_draw(&selector.draw().await);

        let embed = &message.embeds[0];
        assert_eq!(embed.color.map(EmbedColor::value), Some(0xFF0000));
        assert_eq!(embed.field(FIELD_PAID_ONLY).map(|f| f.value.as_str()), Some("否"));
        assert_eq!(embed.field(FIELD_DIFFICULTY).map(|f| f.value.as_str()), Some("Hard"));
        assert_eq!(embed.field(FIELD_TAGS).map(|f| f.value.as_str()), Some("Array, Two Pointers"));
        assert_eq!(
            embed.url.as_deref(),
            Some("https://leetcode.com/problems/trapping-rain-water/description/")
        );
        assert_eq!(
            embed.field(FIELD_CONTENT).map(|f| f.value.as_str()),
            Some("Given n non-negative integers ...")
        );
    }

    #[tokio::test]
    async fn empty_catalog_renders_apology_text() {
        let source = SingleQuestionSource { slugs: Vec::new(), detail: hard_detail() };
        let selector = QuestionSelector::new(source);

        let result = selector.draw().await;
        assert_eq!(result, Err(DrawError::EmptyCatalog));

        let message = render_draw(&result);
        assert_eq!(message.content.as_deref(), Some("抱歉，無法獲取題目。請稍後再試！"));
        assert!(message.embeds.is_empty());
    }
}
