/// A parsed user utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look at the surroundings again.
    Rescan,
    /// End the session.
    Quit,
    /// Anything else; the raw text is kept as a possible question.
    Other(String),
}

/// Map an utterance to a [`Command`].
///
/// Quit phrases match whole utterances, except `stop`, which is honored
/// anywhere inside a spoken sentence.
pub fn parse_command(input: &str) -> Command {
    let folded = input.trim().to_lowercase();
    match folded.as_str() {
        "rescan" | "scan again" => Command::Rescan,
        "q" | "quit" | "exit" | "stop" | "thank you" => Command::Quit,
        _ if folded.split_whitespace().any(|word| word == "stop") => Command::Quit,
        _ => Command::Other(input.trim().to_string()),
    }
}
