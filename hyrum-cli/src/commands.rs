//! REPL command parsing

/// One line of user input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `sair`, `exit`, `quit`
    Exit,
    /// `historico`
    History,
    /// `limpar`
    Clear,
    /// `base`
    Knowledge,
    /// `recarregar`
    Reload,
    /// `ajuda`
    Help,
    /// Blank line
    Empty,
    /// Anything else, forwarded to the assistant
    Chat(String),
}

impl Command {
    /// Classify a raw input line. Keywords are matched case-insensitively on
    /// the trimmed line; chat text keeps its original case.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        match trimmed.to_lowercase().as_str() {
            "" => Command::Empty,
            "sair" | "exit" | "quit" => Command::Exit,
            "historico" | "histórico" => Command::History,
            "limpar" => Command::Clear,
            "base" => Command::Knowledge,
            "recarregar" => Command::Reload,
            "ajuda" => Command::Help,
            _ => Command::Chat(trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_family() {
        for input in ["sair", "EXIT", " Quit \n"] {
            assert_eq!(Command::parse(input), Command::Exit);
        }
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(Command::parse("HISTORICO"), Command::History);
        assert_eq!(Command::parse("Histórico"), Command::History);
        assert_eq!(Command::parse("Limpar"), Command::Clear);
        assert_eq!(Command::parse("base\n"), Command::Knowledge);
        assert_eq!(Command::parse("recarregar"), Command::Reload);
        assert_eq!(Command::parse("ajuda"), Command::Help);
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   \n"), Command::Empty);
    }

    #[test]
    fn test_chat_keeps_case_and_trims() {
        assert_eq!(
            Command::parse("  Skyrim ou Fallout New Vegas?\n"),
            Command::Chat("Skyrim ou Fallout New Vegas?".to_string())
        );
    }

    #[test]
    fn test_keyword_inside_sentence_is_chat() {
        assert_eq!(
            Command::parse("quero sair da lista de emails"),
            Command::Chat("quero sair da lista de emails".to_string())
        );
    }
}
