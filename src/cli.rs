use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};

#[derive(Parser)]
#[command(name = "utsushi")]
#[command(about = "Type Japanese sentences with reading hints and spoken playback")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Practice the sentences of a text file, or of text pasted on stdin
    Practice { file: Option<PathBuf> },

    /// Search Genius for a song and practice its lyrics line by line
    Lyrics {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List the Japanese voices found on this machine
    Voices,
}

/// One line typed during practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopCommand {
    Hint,
    Play,
    Say(usize),
    Voice(String),
    Voices,
    Quit,
    Help,
    Input(String),
}

impl LoopCommand {
    /// Lines starting with `:` are commands; anything else is card input.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Ok(LoopCommand::Input(line.to_string()));
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        match name {
            "hint" | "h" => Ok(LoopCommand::Hint),
            "play" | "p" => Ok(LoopCommand::Play),
            "say" => argument
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(LoopCommand::Say)
                .ok_or_else(|| "usage: :say N (group number from :hint)".to_string()),
            "voice" if !argument.is_empty() => Ok(LoopCommand::Voice(argument.to_string())),
            "voice" | "voices" => Ok(LoopCommand::Voices),
            "quit" | "q" => Ok(LoopCommand::Quit),
            "help" | "?" => Ok(LoopCommand::Help),
            other => Err(format!("unknown command :{other} (try :help)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::parse_from(["utsushi", "practice", "story.txt"]);
        assert_eq!(cli.command, Commands::Practice { file: Some(PathBuf::from("story.txt")) });

        let cli = Cli::parse_from(["utsushi", "-v", "lyrics", "夜に駆ける", "YOASOBI"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Lyrics { query: vec!["夜に駆ける".to_string(), "YOASOBI".to_string()] }
        );
    }

    #[test]
    fn test_loop_commands() {
        assert_eq!(LoopCommand::parse(":hint"), Ok(LoopCommand::Hint));
        assert_eq!(LoopCommand::parse(" :say 2 "), Ok(LoopCommand::Say(2)));
        assert_eq!(LoopCommand::parse(":voice Kyoko"), Ok(LoopCommand::Voice("Kyoko".to_string())));
        assert_eq!(LoopCommand::parse(":voice"), Ok(LoopCommand::Voices));
        assert!(LoopCommand::parse(":say 0").is_err());
        assert!(LoopCommand::parse(":jump").is_err());
        assert_eq!(
            LoopCommand::parse("猫が好き"),
            Ok(LoopCommand::Input("猫が好き".to_string()))
        );
    }
}
