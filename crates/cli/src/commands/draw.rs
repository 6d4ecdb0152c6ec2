use leetdraw_core::{
    config::{AppConfig, LoadOptions, RuntimeProfile},
    DisplayRecord, DrawError, QuestionSelector, SeededPicker, APOLOGY_MESSAGE,
};
use leetdraw_leetcode::LeetCodeClient;
use serde::Serialize;

use super::{CommandResult, EXIT_CONFIG, EXIT_DRAW_FAILED, EXIT_RUNTIME};

const COMMAND: &str = "draw";

#[derive(Debug, Serialize)]
struct DrawOutput<'a> {
    command: &'static str,
    status: &'static str,
    question: &'a DisplayRecord,
}

pub fn run(json_output: bool, seed: Option<u64>) -> CommandResult {
    let options = LoadOptions { profile: RuntimeProfile::Cli, ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return failure(json_output, "config_validation", error.to_string(), EXIT_CONFIG);
        }
    };

    let client = match LeetCodeClient::new(&config.leetcode) {
        Ok(client) => client,
        Err(error) => return failure(json_output, "client_setup", error.to_string(), EXIT_RUNTIME),
    };

    let mut selector = QuestionSelector::new(client)
        .with_url_template(config.leetcode.problem_url_template.clone());
    if let Some(seed) = seed {
        selector = selector.with_picker(SeededPicker::new(seed));
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return failure(
                json_output,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    match runtime.block_on(selector.draw()) {
        Ok(record) => CommandResult { exit_code: 0, output: render_record(&record, json_output) },
        Err(error) => draw_failure(json_output, &error),
    }
}

fn render_record(record: &DisplayRecord, json_output: bool) -> String {
    if json_output {
        let payload = DrawOutput { command: COMMAND, status: "ok", question: record };
        return serde_json::to_string_pretty(&payload).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"draw\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                super::escape_json(&error.to_string())
            )
        });
    }

    [
        "隨機抽到的題目：".to_string(),
        format!("id: {}", record.id),
        format!("title: {}", record.title),
        format!("titleSlug: {}", record.slug),
        format!("content: {}", record.content.as_deref().unwrap_or_default()),
        format!("isPaidOnly: {}", record.is_paid_only),
        format!("difficulty: {}", record.difficulty),
        format!("likes: {}", record.likes),
        format!("dislikes: {}", record.dislikes),
        format!("tag: {}", record.tags),
        format!("題目連結: {}", record.question_url),
    ]
    .join("\n")
}

fn draw_failure(json_output: bool, error: &DrawError) -> CommandResult {
    let error_class = format!("draw_{}", error.stage());
    failure(json_output, &error_class, error.to_string(), EXIT_DRAW_FAILED)
}

fn failure(json_output: bool, error_class: &str, message: String, exit_code: u8) -> CommandResult {
    if json_output {
        return CommandResult::failure(COMMAND, error_class, message, exit_code);
    }
    CommandResult {
        exit_code,
        output: format!("{APOLOGY_MESSAGE}\nerror ({error_class}): {message}"),
    }
}

#[cfg(test)]
mod tests {
    use leetdraw_core::{Difficulty, DisplayRecord, DrawError, QuestionSlug};

    use super::{draw_failure, render_record};

    fn record() -> DisplayRecord {
        DisplayRecord {
            id: "1".to_string(),
            title: "Two Sum".to_string(),
            slug: QuestionSlug::new("two-sum"),
            content: None,
            is_paid_only: false,
            difficulty: Difficulty::Easy,
            likes: 5,
            dislikes: 1,
            tags: "Array, Hash Table".to_string(),
            question_url: "https://leetcode.com/problems/two-sum/description/".to_string(),
        }
    }

    #[test]
    fn text_output_lists_every_field_in_order() {
        let output = render_record(&record(), false);
        let keys: Vec<&str> = output
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(": ").map(|(key, _)| key))
            .collect();

        assert_eq!(
            keys,
            vec![
                "id", "title", "titleSlug", "content", "isPaidOnly", "difficulty", "likes",
                "dislikes", "tag", "題目連結"
            ]
        );
        assert!(output.contains("difficulty: Easy"));
        assert!(output.ends_with("題目連結: https://leetcode.com/problems/two-sum/description/"));
    }

    #[test]
    fn json_output_embeds_the_display_record() {
        let output = render_record(&record(), true);
        let payload: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["question"]["slug"], "two-sum");
        assert_eq!(payload["question"]["difficulty"], "Easy");
        assert!(payload["question"]["content"].is_null());
    }

    #[test]
    fn failure_text_leads_with_apology() {
        let result = draw_failure(false, &DrawError::EmptyCatalog);

        assert_eq!(result.exit_code, 4);
        assert!(result.output.starts_with("抱歉，無法獲取題目。請稍後再試！"));
        assert!(result.output.contains("draw_catalog"));
    }
}
