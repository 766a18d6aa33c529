//! Control-token resolution.
//!
//! A control token is a literal string embedded in the prompt sent to the
//! vision-language model; it selects which behavior mode the model runs in.
//! The vocabulary must stay bit-exact with what the pretrained model was
//! trained on, so the literals below are never rewritten or derived.
//!
//! The forward mapping from (task, options, prompt-presence) to token and
//! the reverse mapping from token back to task are both derived from the
//! single declarative [`TOKEN_TABLE`] so they cannot diverge.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::{CaptionFormat, Task, TaskOptions};

/// A control token understood by the underlying model.
///
/// Only tokens from the fixed vocabulary can be constructed; resolution via
/// [`resolve_token`] is the only public way to obtain one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ControlToken(&'static str);

impl ControlToken {
    /// Returns the literal token string.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ControlToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Task refinement selecting one entry of the token vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenVariant {
    /// The task's default token, used when no discriminator applies.
    Default,
    /// Caption with an explicit detail format.
    Caption(CaptionFormat),
    /// OCR with or without region polygons.
    OcrRegions(bool),
    /// Detection targeted by free text.
    OpenVocabulary,
}

/// One row of the control-token vocabulary.
struct TokenSpec {
    task: Task,
    variant: TokenVariant,
    token: &'static str,
    /// Whether the model accepts free text appended after this token.
    accepts_prompt: bool,
}

/// The complete control-token vocabulary.
///
/// Several rows share a token (a caption with the short format is the same
/// mode as a caption with no options); the reverse direction is therefore
/// many-to-one onto tasks.
const TOKEN_TABLE: &[TokenSpec] = &[
    TokenSpec {
        task: Task::Caption,
        variant: TokenVariant::Default,
        token: "<CAPTION>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Caption,
        variant: TokenVariant::Caption(CaptionFormat::Short),
        token: "<CAPTION>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Caption,
        variant: TokenVariant::Caption(CaptionFormat::Medium),
        token: "<DETAILED_CAPTION>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Caption,
        variant: TokenVariant::Caption(CaptionFormat::Long),
        token: "<MORE_DETAILED_CAPTION>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Caption,
        variant: TokenVariant::Caption(CaptionFormat::Dense),
        token: "<DENSE_REGION_CAPTION>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Detection,
        variant: TokenVariant::Default,
        token: "<OD>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Detection,
        variant: TokenVariant::OpenVocabulary,
        token: "<OPEN_VOCABULARY_DETECTION>",
        accepts_prompt: true,
    },
    TokenSpec {
        task: Task::Ocr,
        variant: TokenVariant::Default,
        token: "<OCR>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Ocr,
        variant: TokenVariant::OcrRegions(false),
        token: "<OCR>",
        accepts_prompt: false,
    },
    TokenSpec {
        task: Task::Ocr,
        variant: TokenVariant::OcrRegions(true),
        token: "<OCR_WITH_REGION>",
        accepts_prompt: false,
    },
];

fn lookup(task: Task, variant: TokenVariant) -> Option<&'static TokenSpec> {
    TOKEN_TABLE
        .iter()
        .find(|spec| spec.task == task && spec.variant == variant)
}

/// Maps the supplied options to a vocabulary variant, if they belong to the
/// requested task.
fn variant_for_options(task: Task, options: &TaskOptions) -> Option<TokenVariant> {
    match (task, options) {
        (Task::Caption, TaskOptions::Caption(caption)) => {
            Some(TokenVariant::Caption(caption.format))
        }
        (Task::Ocr, TaskOptions::Ocr(ocr)) => Some(TokenVariant::OcrRegions(ocr.polys)),
        _ => None,
    }
}

fn prompt_present(prompt: Option<&str>) -> bool {
    prompt.is_some_and(|p| !p.trim().is_empty())
}

/// Resolves the control token for a request.
///
/// Resolution order:
///
/// 1. An options discriminator matching the task (caption format, OCR
///    polygon flag) wins over every other rule.
/// 2. Detection with a non-empty free-text prompt resolves to
///    open-vocabulary detection; the prompt is the detection target.
/// 3. Otherwise the task's default token is used.
///
/// A non-empty prompt paired with a resolved token whose mode does not
/// accept free text is rejected rather than silently ignored.
///
/// Pure function of its arguments; safe to call concurrently.
///
/// # Errors
///
/// Returns a validation error when the options payload does not belong to
/// the requested task, or when a free-text prompt is supplied where the
/// resolved token forbids one.
pub fn resolve_token(
    task: Task,
    prompt: Option<&str>,
    options: Option<&TaskOptions>,
) -> Result<ControlToken> {
    let has_prompt = prompt_present(prompt);

    let spec = if let Some(options) = options {
        let variant = variant_for_options(task, options).ok_or_else(|| {
            Error::validation().with_message(format!("options do not apply to the {task} task"))
        })?;
        lookup(task, variant)
    } else if task == Task::Detection && has_prompt {
        lookup(task, TokenVariant::OpenVocabulary)
    } else {
        lookup(task, TokenVariant::Default)
    }
    .ok_or_else(|| {
        Error::internal_error().with_message(format!("no token registered for the {task} task"))
    })?;

    if has_prompt && !spec.accepts_prompt {
        return Err(Error::validation()
            .with_message(format!("the {task} task does not support a text prompt")));
    }

    tracing::trace!(
        target: crate::TRACING_TARGET_TOKEN,
        task = %task,
        token = spec.token,
        "resolved control token"
    );

    Ok(ControlToken(spec.token))
}

/// Maps a control token back to its task.
///
/// Total over every token [`resolve_token`] can produce. Unknown tokens
/// return `None`; the normalizer relies on that to drop model capabilities
/// this crate does not model yet.
pub fn token_to_task(token: &str) -> Option<Task> {
    TOKEN_TABLE
        .iter()
        .find(|spec| spec.token == token)
        .map(|spec| spec.task)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::task::{CaptionOptions, OcrOptions};

    /// Every (task, options) combination a client can express.
    fn all_option_combinations() -> Vec<(Task, Option<TaskOptions>)> {
        let mut combinations = Vec::new();
        for task in Task::iter() {
            combinations.push((task, None));
        }
        for format in CaptionFormat::iter() {
            combinations.push((Task::Caption, Some(CaptionOptions { format }.into())));
        }
        for polys in [false, true] {
            combinations.push((Task::Ocr, Some(OcrOptions { polys }.into())));
        }
        combinations
    }

    #[test]
    fn forward_reverse_round_trip() {
        for (task, options) in all_option_combinations() {
            let token = resolve_token(task, None, options.as_ref()).unwrap();
            assert_eq!(
                token_to_task(token.as_str()),
                Some(task),
                "round trip failed for {task} with {options:?}"
            );
        }
    }

    #[test]
    fn every_task_has_a_default() {
        for task in Task::iter() {
            resolve_token(task, None, None).unwrap();
        }
    }

    #[test]
    fn detection_prompt_switches_to_open_vocabulary() {
        let token = resolve_token(Task::Detection, Some("a cat"), None).unwrap();
        assert_eq!(token.as_str(), "<OPEN_VOCABULARY_DETECTION>");

        let token = resolve_token(Task::Detection, None, None).unwrap();
        assert_eq!(token.as_str(), "<OD>");
    }

    #[test]
    fn blank_prompt_is_treated_as_absent() {
        let token = resolve_token(Task::Detection, Some("   "), None).unwrap();
        assert_eq!(token.as_str(), "<OD>");
    }

    #[test]
    fn caption_formats_resolve_to_distinct_tokens() {
        let cases = [
            (CaptionFormat::Short, "<CAPTION>"),
            (CaptionFormat::Medium, "<DETAILED_CAPTION>"),
            (CaptionFormat::Long, "<MORE_DETAILED_CAPTION>"),
            (CaptionFormat::Dense, "<DENSE_REGION_CAPTION>"),
        ];
        for (format, expected) in cases {
            let options = TaskOptions::from(CaptionOptions { format });
            let token = resolve_token(Task::Caption, None, Some(&options)).unwrap();
            assert_eq!(token.as_str(), expected);
        }
    }

    #[test]
    fn ocr_polys_flag_selects_region_token() {
        let options = TaskOptions::from(OcrOptions { polys: true });
        let token = resolve_token(Task::Ocr, None, Some(&options)).unwrap();
        assert_eq!(token.as_str(), "<OCR_WITH_REGION>");

        let options = TaskOptions::from(OcrOptions { polys: false });
        let token = resolve_token(Task::Ocr, None, Some(&options)).unwrap();
        assert_eq!(token.as_str(), "<OCR>");
    }

    #[test]
    fn prompt_rejected_where_token_forbids_it() {
        let dense = TaskOptions::from(CaptionOptions {
            format: CaptionFormat::Dense,
        });
        let error = resolve_token(Task::Caption, Some("a cat"), Some(&dense)).unwrap_err();
        assert!(error.is_client_error());

        let error = resolve_token(Task::Ocr, Some("read this"), None).unwrap_err();
        assert!(error.is_client_error());
    }

    #[test]
    fn mismatched_options_rejected() {
        let options = TaskOptions::from(OcrOptions { polys: true });
        let error = resolve_token(Task::Caption, None, Some(&options)).unwrap_err();
        assert!(error.is_client_error());

        let options = TaskOptions::from(CaptionOptions::default());
        let error = resolve_token(Task::Detection, None, Some(&options)).unwrap_err();
        assert!(error.is_client_error());
    }

    #[test]
    fn unknown_token_has_no_task() {
        assert_eq!(token_to_task("<REGION_PROPOSAL>"), None);
        assert_eq!(token_to_task(""), None);
    }
}
