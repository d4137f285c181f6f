/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Stop,
    Reset,
    Quit,
    /// Blank line.
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        "" => Command::Empty,
        "/stop" => Command::Stop,
        "/reset" | "/clear" => Command::Reset,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Ask(trimmed.to_string()),
    }
}
