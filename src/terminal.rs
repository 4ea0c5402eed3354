use std::sync::Arc;

use tokio::io::{
    AsyncBufReadExt,
    BufReader,
    Lines,
    Stdin,
};
use utsushi::{
    hints::{
        HintComposer,
        HintView,
        StyleClass,
    },
    practice::{
        CardView,
        CharSpan,
        InputOutcome,
        PracticeSession,
    },
    speech::{
        SpeechPlayer,
        VoiceSelector,
    },
    UtsushiError,
};

use crate::cli::LoopCommand;

pub type InputLines = Lines<BufReader<Stdin>>;

macro_rules! paint {
    ($text:expr, "red") => { format!("\x1b[31m{}\x1b[0m", $text) };
    ($text:expr, "green") => { format!("\x1b[32m{}\x1b[0m", $text) };
    ($text:expr, "yellow") => { format!("\x1b[33m{}\x1b[0m", $text) };
    ($text:expr, "blue") => { format!("\x1b[34m{}\x1b[0m", $text) };
    ($text:expr, "magenta") => { format!("\x1b[35m{}\x1b[0m", $text) };
    ($text:expr, "cyan") => { format!("\x1b[36m{}\x1b[0m", $text) };
    ($text:expr, "gray") => { format!("\x1b[90m{}\x1b[0m", $text) };
    ($text:expr, "bold") => { format!("\x1b[1m{}\x1b[0m", $text) };
}

const HELP: &str = "Type the sentence and press enter. Commands: \
    :hint, :play, :say N, :voice NAME, :voices, :quit";

pub fn render_card(view: &CardView<'_>) -> String {
    let marker = match (view.complete, view.focused) {
        (true, _) => paint!("✔", "green"),
        (false, true) => paint!("▶", "bold"),
        (false, false) => " ".to_string(),
    };

    let mut out = format!("{} {:>3}  {}", marker, view.index + 1, view.sentence);
    if !view.spans.is_empty() && !view.complete {
        let typed: String = view
            .spans
            .iter()
            .map(|span| match span {
                CharSpan::Correct(c) => paint!(c, "green"),
                CharSpan::Incorrect(c) => paint!(c, "red"),
                CharSpan::LineBreak => paint!("↵", "gray"),
            })
            .collect();
        out.push_str(&format!("\n       {typed}"));
    }
    out
}

fn paint_style(text: &str, style: StyleClass) -> String {
    match style {
        StyleClass::Noun => paint!(text, "blue"),
        StyleClass::Verb => paint!(text, "green"),
        StyleClass::Particle => paint!(text, "gray"),
        StyleClass::Auxiliary => paint!(text, "magenta"),
        StyleClass::Adjective => paint!(text, "yellow"),
        StyleClass::Adverb => paint!(text, "cyan"),
        StyleClass::Symbol | StyleClass::Other => text.to_string(),
    }
}

pub fn render_hint(hint: &HintView) -> String {
    match hint {
        HintView::Hidden => String::new(),
        HintView::Loading => paint!("Loading hints…", "gray"),
        HintView::Ready(groups) if groups.is_empty() => paint!("No hint for this sentence", "gray"),
        HintView::Ready(groups) => groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                format!(
                    "  {:>2}. {}  {}",
                    i + 1,
                    paint_style(&group.surface, group.style),
                    paint!(&group.romanized, "gray")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        HintView::Failed { message } => {
            paint!(format!("Hint unavailable: {message} (try :hint again)"), "red")
        }
    }
}

pub fn render_voices(selector: &VoiceSelector) -> String {
    match selector {
        VoiceSelector::Disabled { placeholder } => paint!(placeholder, "gray"),
        VoiceSelector::Options { options, selected } => options
            .iter()
            .map(|option| {
                let mark = if selected.as_deref() == Some(option.name.as_str()) { "*" } else { " " };
                format!(" {mark} {}", option.label)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{}", paint!(message, "red"));
}

/// Interactive practice over every loaded card.
pub struct PracticeLoop {
    pub session: PracticeSession,
    pub composer: HintComposer,
    pub player: Arc<SpeechPlayer>,
}

impl PracticeLoop {
    fn print_focused(&self) {
        if let Some(view) = self.session.focused().and_then(|i| self.session.views().into_iter().nth(i)) {
            println!("{}", render_card(&view));
        }
    }

    fn print_all(&self) {
        for view in self.session.views() {
            println!("{}", render_card(&view));
        }
    }

    pub async fn run(&mut self, lines: &mut InputLines) -> Result<(), UtsushiError> {
        println!("{}", paint!(HELP, "gray"));
        self.print_all();

        let mut interacted = false;
        while let Some(line) = lines.next_line().await? {
            if !interacted {
                self.player.arm_heartbeat();
                interacted = true;
            }

            match LoopCommand::parse(&line) {
                Ok(LoopCommand::Quit) => break,
                Ok(command) => self.handle(command).await,
                Err(message) => print_error(message),
            }

            if self.session.is_finished() {
                println!("{}", paint!("All sentences complete. お疲れさま！", "green"));
                break;
            }
        }

        self.player.cancel();
        Ok(())
    }

    async fn handle(&mut self, command: LoopCommand) {
        let Some(focused) = self.session.focused() else {
            print_error("Nothing to practice");
            return;
        };

        match command {
            LoopCommand::Input(text) => match self.session.input(focused, &text) {
                Ok(InputOutcome::Updated) => self.print_focused(),
                Ok(InputOutcome::Completed { next_focus }) => {
                    if let Some(view) = self.session.views().into_iter().nth(focused) {
                        println!("{}", render_card(&view));
                    }
                    if next_focus.is_some() {
                        self.print_focused();
                    }
                }
                Err(e) => print_error(e),
            },
            LoopCommand::Hint => {
                println!("{}", render_hint(&HintView::Loading));
                match self.session.request_hint(focused, &self.composer).await {
                    Ok(hint) => println!("{}", render_hint(hint)),
                    Err(e) => print_error(e),
                }
            }
            LoopCommand::Play => match self.session.card(focused) {
                Ok(card) => self.player.speak(card.sentence()),
                Err(e) => print_error(e),
            },
            LoopCommand::Say(number) => {
                let group = self
                    .session
                    .card(focused)
                    .ok()
                    .and_then(|card| card.hint.groups().get(number - 1).cloned());
                match group {
                    Some(group) => self.player.speak(&group.speech_text()),
                    None => print_error(format!("No hint group {number}; run :hint first")),
                }
            }
            LoopCommand::Voice(name) => match self.player.catalog().select(&name) {
                Ok(voice) => println!("Voice: {} ({})", voice.name, voice.provider_id),
                Err(e) => print_error(e),
            },
            LoopCommand::Voices => println!("{}", render_voices(&self.player.catalog().selector())),
            LoopCommand::Help => println!("{}", paint!(HELP, "gray")),
            LoopCommand::Quit => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use utsushi::{
        hints::BunsetsuGroup,
        speech::VoiceOption,
        PartOfSpeech,
        Token,
    };

    use super::*;

    #[test]
    fn test_render_card_marks_mistakes() {
        let mut session = PracticeSession::new().unwrap();
        session.load_text("猫が好き。");
        session.input(0, "猫を").unwrap();

        let rendered = render_card(&session.views()[0]);
        assert!(rendered.contains("猫が好き。"));
        assert!(rendered.contains("\x1b[32m猫\x1b[0m"));
        assert!(rendered.contains("\x1b[31mを\x1b[0m"));
    }

    #[test]
    fn test_render_hint_states() {
        let group = BunsetsuGroup::from_tokens(vec![
            Token::new("本", Some("ホン"), PartOfSpeech::Noun),
            Token::new("を", Some("ヲ"), PartOfSpeech::Particle),
        ]);
        let ready = render_hint(&HintView::Ready(vec![group]));
        assert!(ready.contains("本 を"));
        assert!(ready.contains("hon o"));

        let failed = render_hint(&HintView::Failed { message: "no dictionary".to_string() });
        assert!(failed.contains("try :hint again"));
        assert!(render_hint(&HintView::Hidden).is_empty());
    }

    #[test]
    fn test_render_voices_marks_selection() {
        let selector = VoiceSelector::Options {
            options: vec![
                VoiceOption { name: "Kyoko".to_string(), label: "Kyoko (say)".to_string() },
                VoiceOption { name: "Otoya".to_string(), label: "Otoya (say)".to_string() },
            ],
            selected: Some("Otoya".to_string()),
        };
        assert_eq!(render_voices(&selector), "   Kyoko (say)\n * Otoya (say)");
    }
}
