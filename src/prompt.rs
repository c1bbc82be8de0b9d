use dialoguer::{Confirm, Input, theme::ColorfulTheme};

/// Abstraction over a string input prompt.
///
/// Implementors define how string input is collected from the user.
/// Decoupling input from the logic that consumes it keeps the CLI testable.
pub trait StringPrompter {
    /// Prompt the user for a string input.
    ///
    /// # Parameters
    /// - `prompt`: The message shown to the user.
    /// - `default`: Value used if the user presses Enter without input.
    ///   An empty default means input is required.
    ///
    /// # Returns
    /// `Ok(String)` if input is successfully collected, or an `Err(String)` describing the failure.
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String>;
}

/// Abstraction over a boolean (yes/no) confirmation prompt.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Default implementation of `StringPrompter` using `dialoguer::Input`.
pub struct DialoguerStringPrompter;

impl StringPrompter for DialoguerStringPrompter {
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String, String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        match input.interact_text() {
            Ok(v) => Ok(v.trim().to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let theme = ColorfulTheme::default();
        let confirm = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Prompt for a value, optionally naming the repository it applies to.
///
/// With a repository name the prompt reads `"New author name for my-repo"`;
/// without one it is just the label.
///
/// # Returns
/// - `Ok(String)` containing the trimmed user input or the default.
/// - `Err(String)` if the input could not be collected.
pub fn ask<P: StringPrompter>(
    prompter: &mut P,
    label: &str,
    repo_name: Option<&str>,
    default_value: &str,
) -> Result<String, String> {
    let prompt = match repo_name {
        Some(name) => format!("{} for {}", label, name),
        None => label.to_string(),
    };
    prompter
        .prompt(&prompt, default_value)
        .map(|v| v.trim().to_string())
}

/// Returns `preset` if given, otherwise asks.
///
/// Values passed on the command line skip their prompt.
pub fn preset_or_ask<P: StringPrompter>(
    prompter: &mut P,
    preset: Option<&str>,
    label: &str,
    repo_name: Option<&str>,
    default_value: &str,
) -> Result<String, String> {
    match preset {
        Some(v) => Ok(v.trim().to_string()),
        None => ask(prompter, label, repo_name, default_value),
    }
}

/// Ask the user to confirm the destructive mirror push.
pub fn confirm_transfer<P: ConfirmPrompter>(prompter: &mut P) -> Result<bool, String> {
    let prompt = "Start transfer? (destination refs will be overwritten to mirror the source)";
    prompter.confirm(prompt, false)
}
