use leetdraw_core::{Difficulty, FetchError, QuestionDetail, QuestionSlug, TopicTag};
use serde::{Deserialize, Serialize};

pub const QUESTION_DATA_OPERATION: &str = "questionData";

pub const QUESTION_DATA_QUERY: &str = "query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    isPaidOnly
    difficulty
    likes
    dislikes
    topicTags {
      name
      slug
    }
  }
}
";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDataRequest<'a> {
    pub operation_name: &'a str,
    pub variables: QuestionDataVariables<'a>,
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDataVariables<'a> {
    pub title_slug: &'a str,
}

impl<'a> QuestionDataRequest<'a> {
    pub fn new(slug: &'a QuestionSlug) -> Self {
        Self {
            operation_name: QUESTION_DATA_OPERATION,
            variables: QuestionDataVariables { title_slug: slug.as_str() },
            query: QUESTION_DATA_QUERY,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionData {
    pub question: Option<QuestionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionNode {
    pub question_id: String,
    #[serde(default)]
    pub question_frontend_id: String,
    pub title: String,
    pub title_slug: String,
    pub content: Option<String>,
    #[serde(default)]
    pub is_paid_only: bool,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
    #[serde(default)]
    pub topic_tags: Vec<TopicTagNode>,
}

#[derive(Debug, Deserialize)]
pub struct TopicTagNode {
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl From<QuestionNode> for QuestionDetail {
    fn from(node: QuestionNode) -> Self {
        Self {
            id: node.question_id,
            frontend_id: node.question_frontend_id,
            title: node.title,
            slug: QuestionSlug::new(node.title_slug),
            raw_content: node.content,
            is_paid_only: node.is_paid_only,
            difficulty: Difficulty::parse(&node.difficulty),
            likes: node.likes,
            dislikes: node.dislikes,
            tags: node
                .topic_tags
                .into_iter()
                .map(|tag| TopicTag { name: tag.name, slug: tag.slug })
                .collect(),
        }
    }
}

/// Maps a decoded `questionData` response onto the domain record.
///
/// GraphQL reports failures in-band with HTTP 200, so errors and a `null` question are
/// checked here rather than by status code.
pub fn into_question_detail(
    response: GraphQlResponse<QuestionData>,
    slug: &QuestionSlug,
    url: &str,
) -> Result<QuestionDetail, FetchError> {
    if let Some(question) = response.data.and_then(|data| data.question) {
        return Ok(question.into());
    }

    if response.errors.is_empty() {
        return Err(FetchError::NotFound { slug: slug.to_string() });
    }

    let message =
        response.errors.iter().map(|error| error.message.as_str()).collect::<Vec<_>>().join("; ");
    Err(FetchError::Shape { url: url.to_owned(), message: format!("graphql errors: {message}") })
}
