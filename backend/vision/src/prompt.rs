//! The fixed grading instruction and conversation assembly.

use media::DataUri;
use once_cell::sync::Lazy;
use snapgrade_core::SECTION_SENTINEL;

use crate::types::{Content, InlineData, Part, Role};

/// Instruction sent with every image. The wording fixes the response
/// structure: a description of the photographed work, then the section
/// marker, then the graded read-out.
pub static GRADING_INSTRUCTION: Lazy<String> = Lazy::new(|| {
    format!(
        "You are grading a photographed handwritten algebra solution. \
         Begin by describing what is visible in the photo: the problem as \
         written and the steps the student wrote down. Then output the \
         single character '{SECTION_SENTINEL}' and continue with the graded \
         read-out: restate the recognized problem, evaluate whether each \
         step is mathematically correct, state whether the final answer is \
         correct, and grade the work against a five-point rubric, awarding \
         points per criterion and summing them into a final score out of 5."
    )
});

/// Build the two-turn conversation for one image.
///
/// The user turn carries the instruction plus the image. The model turn is
/// seeded with the bare section marker, so generation resumes immediately
/// after it and the client-visible stream starts inside the description.
pub fn build_grading_contents(image: &DataUri) -> Vec<Content> {
    vec![
        Content {
            role: Role::User,
            parts: vec![
                Part::Text {
                    text: GRADING_INSTRUCTION.clone(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            ],
        },
        Content {
            role: Role::Model,
            parts: vec![Part::Text {
                text: SECTION_SENTINEL.to_string(),
            }],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> DataUri {
        DataUri {
            mime_type: "image/jpeg".to_string(),
            data: "/9j/4AAQSkZJRg==".to_string(),
        }
    }

    #[test]
    fn conversation_has_user_then_seeded_model_turn() {
        let contents = build_grading_contents(&sample_image());
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, Role::User);
        assert_eq!(contents[1].role, Role::Model);
    }

    #[test]
    fn user_turn_carries_instruction_and_image() {
        let contents = build_grading_contents(&sample_image());
        let parts = &contents[0].parts;
        assert_eq!(parts.len(), 2);
        match &parts[0] {
            Part::Text { text } => assert_eq!(text, GRADING_INSTRUCTION.as_str()),
            other => panic!("expected text first, got {other:?}"),
        }
        match &parts[1] {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/jpeg");
                assert_eq!(inline_data.data, "/9j/4AAQSkZJRg==");
            }
            other => panic!("expected inline data second, got {other:?}"),
        }
    }

    #[test]
    fn model_turn_is_solely_the_marker() {
        let contents = build_grading_contents(&sample_image());
        assert_eq!(contents[1].parts.len(), 1);
        match &contents[1].parts[0] {
            Part::Text { text } => assert_eq!(text, &SECTION_SENTINEL.to_string()),
            other => panic!("expected a text part, got {other:?}"),
        }
    }

    #[test]
    fn instruction_names_the_marker_and_the_rubric() {
        assert!(GRADING_INSTRUCTION.contains(SECTION_SENTINEL));
        assert!(GRADING_INSTRUCTION.contains("five-point rubric"));
        assert!(GRADING_INSTRUCTION.contains("final answer"));
    }
}
