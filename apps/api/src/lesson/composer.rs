//! Prompt Composer: pure string assembly over validated input.
//!
//! Same input, same output: the result is embedded verbatim in the wire request.

use crate::lesson::models::LessonPlanInput;
use crate::lesson::prompts::{
    ACTIVITY_TABLE_HEADER, CREATE_PROMPT_TEMPLATE, ENHANCE_PROMPT_TEMPLATE, NLS_AUTO_INSTRUCTION,
    NLS_CONTEXT_REF, NLS_SELECTED_TEMPLATE, YCCD_FALLBACK,
};

pub fn compose_create_prompt(input: &LessonPlanInput) -> String {
    let yccd = if input.yccd.trim().is_empty() {
        YCCD_FALLBACK
    } else {
        input.yccd.as_str()
    };
    let nls_instruction = nls_instruction(&input.selected_nls);

    fill_template(
        CREATE_PROMPT_TEMPLATE,
        &[
            ("subject", input.subject.label()),
            ("grade", &input.grade),
            ("lesson_name", input.lesson_name.trim()),
            ("textbook", &input.textbook),
            ("duration", &input.duration),
            ("yccd", yccd),
            ("nls_instruction", &nls_instruction),
            ("content", &input.content),
            ("nls_ref", NLS_CONTEXT_REF),
            ("table_header", ACTIVITY_TABLE_HEADER),
        ],
    )
}

pub fn compose_enhance_prompt(content: &str) -> String {
    fill_template(
        ENHANCE_PROMPT_TEMPLATE,
        &[
            ("content", content),
            ("nls_ref", NLS_CONTEXT_REF),
            ("table_header", ACTIVITY_TABLE_HEADER),
        ],
    )
}

/// Mandates the picked codes, or asks the model to infer at least two.
pub fn nls_instruction(selected: &[String]) -> String {
    if selected.is_empty() {
        NLS_AUTO_INSTRUCTION.to_string()
    } else {
        fill_template(NLS_SELECTED_TEMPLATE, &[("codes", &selected.join(", "))])
    }
}

/// Replaces `{key}` placeholders in a single left-to-right pass. Text coming
/// from a value is never scanned again; unknown `{...}` sequences are kept.
pub(crate) fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let hit = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close + 1))
        });

        match hit {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &after[consumed..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
