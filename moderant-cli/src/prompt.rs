//! Interactive input selection.

use dialoguer::Input;
use moderant_core::InputSource;

/// Printed when the first answer is neither `paste` nor `file`.
pub const INVALID_CHOICE: &str = "Invalid input. Please type 'paste' or 'file'.";

/// The user's answer to the first question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Paste,
    File,
}

/// Interpret the first answer, ignoring case and surrounding whitespace.
pub fn parse_choice(answer: &str) -> Option<Choice> {
    match answer.trim().to_lowercase().as_str() {
        "paste" => Some(Choice::Paste),
        "file" => Some(Choice::File),
        _ => None,
    }
}

/// Ask for the input. Returns `None` when the first answer is not recognised.
pub fn ask_source() -> anyhow::Result<Option<InputSource>> {
    let answer: String = Input::new()
        .with_prompt("Do you want to paste text or provide a file? (Type 'paste' or 'file')")
        .allow_empty(true)
        .interact_text()?;

    let source = match parse_choice(&answer) {
        Some(Choice::Paste) => {
            let text: String = Input::new()
                .with_prompt("Paste your text here")
                .allow_empty(true)
                .interact_text()?;
            Some(InputSource::pasted(text))
        }
        Some(Choice::File) => {
            let path: String = Input::new()
                .with_prompt("Enter the file path")
                .interact_text()?;
            Some(InputSource::file(path.trim()))
        }
        None => None,
    };
    Ok(source)
}
