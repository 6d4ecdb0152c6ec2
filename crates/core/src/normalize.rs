//! Text clean-up applied to question details before they are shown in chat.

use scraper::Html;

use crate::domain::question::TopicTag;

pub const TAG_SEPARATOR: &str = ", ";

/// Returns the visible text of an HTML fragment. `None` passes through untouched.
///
/// Entities are decoded by the parser; non-breaking spaces are folded into plain spaces
/// so chat clients wrap the text normally.
pub fn strip_markup(content: Option<&str>) -> Option<String> {
    let content = content?;
    let fragment = Html::parse_fragment(content);
    let text = fragment.root_element().text().collect::<String>();
    Some(text.replace('\u{a0}', " "))
}

pub fn join_tags(tags: &[TopicTag]) -> String {
    tags.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>().join(TAG_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::{join_tags, strip_markup, TAG_SEPARATOR};
    use crate::domain::question::TopicTag;

    fn tag(name: &str) -> TopicTag {
        TopicTag { name: name.to_owned(), slug: name.to_ascii_lowercase().replace(' ', "-") }
    }

    #[test]
    fn strip_markup_passes_none_through() {
        assert_eq!(strip_markup(None), None);
    }

    #[test]
    fn strip_markup_keeps_only_visible_text() {
        assert_eq!(strip_markup(Some("<b>x</b>")).as_deref(), Some("x"));
        assert_eq!(
            strip_markup(Some("<p>Return <em>indices</em> of the two numbers.</p>")).as_deref(),
            Some("Return indices of the two numbers.")
        );
    }

    #[test]
    fn strip_markup_decodes_entities() {
        assert_eq!(
            strip_markup(Some("<code>a &lt; b</code>&nbsp;&amp;&nbsp;c")).as_deref(),
            Some("a < b & c")
        );
    }

    #[test]
    fn strip_markup_leaves_plain_text_alone() {
        assert_eq!(strip_markup(Some("no markup here")).as_deref(), Some("no markup here"));
        assert_eq!(strip_markup(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn join_tags_of_empty_sequence_is_empty() {
        assert_eq!(join_tags(&[]), "");
    }

    #[test]
    fn join_tags_uses_one_separator_between_each_pair() {
        for count in 1..=5 {
            let tags = ["Array", "Hash Table", "Two Pointers", "Sorting", "Greedy"][..count]
                .iter()
                .map(|name| tag(name))
                .collect::<Vec<_>>();

            let joined = join_tags(&tags);

            assert_eq!(joined.matches(TAG_SEPARATOR).count(), count - 1);
            assert!(!joined.starts_with(TAG_SEPARATOR));
            assert!(!joined.ends_with(TAG_SEPARATOR));
        }
    }

    #[test]
    fn join_tags_preserves_order() {
        let tags = vec![tag("Dynamic Programming"), tag("Array")];
        assert_eq!(join_tags(&tags), "Dynamic Programming, Array");
    }
}
