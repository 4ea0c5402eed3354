mod cli;
mod terminal;

use std::{
    io::Write,
    path::Path,
    sync::Arc,
};

use clap::Parser;
use tokio::io::{
    AsyncBufReadExt,
    BufReader,
};
use tracing_subscriber::EnvFilter;
use utsushi::{
    hints::HintComposer,
    lyrics::GeniusClient,
    persistence::JsonFileStore,
    practice::PracticeSession,
    segmentation::TokenizerGateway,
    settings::Settings,
    speech::{
        CommandEngine,
        CommandProvider,
        SpeechPlayer,
        SpeechProvider,
        VoiceCatalog,
    },
    UtsushiError,
};

use crate::{
    cli::{
        Cli,
        Commands,
    },
    terminal::{
        print_error,
        render_voices,
        InputLines,
        PracticeLoop,
    },
};

fn init_tracing(verbose: bool) {
    let default = if verbose { "utsushi=debug" } else { "utsushi=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).compact().init();
}

fn build_catalog(settings: &Settings) -> Arc<VoiceCatalog> {
    let providers: Vec<Arc<dyn SpeechProvider>> = settings
        .speech
        .providers
        .iter()
        .filter_map(|id| match CommandEngine::from_id(id) {
            Some(engine) => Some(CommandProvider::spawn(engine) as Arc<dyn SpeechProvider>),
            None => {
                tracing::warn!(provider = %id, "Unknown speech provider in settings");
                None
            }
        })
        .collect();

    let store = Arc::new(JsonFileStore::open_default());
    Arc::new(VoiceCatalog::new(providers, store, &settings.speech))
}

fn build_player(settings: &Settings) -> Arc<SpeechPlayer> {
    let catalog = build_catalog(settings);

    let loading = catalog.clone();
    tokio::spawn(async move {
        loading.load_voices().await;
    });

    Arc::new(SpeechPlayer::new(catalog, &settings.speech))
}

fn build_composer(settings: &Settings) -> HintComposer {
    HintComposer::new(TokenizerGateway::vibrato(
        settings.dictionary,
        settings.dictionary_path.clone(),
    ))
}

fn prompt(message: &str) {
    print!("{message}");
    let _ = std::io::stdout().flush();
}

/// Reads pasted text up to the first empty line.
async fn read_pasted_text(lines: &mut InputLines) -> Result<String, UtsushiError> {
    println!("Paste the text to practice, then an empty line:");
    let mut text = String::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

async fn run_practice(
    settings: &Settings,
    session: PracticeSession,
    lines: &mut InputLines,
) -> Result<(), UtsushiError> {
    let mut practice = PracticeLoop {
        session,
        composer: build_composer(settings),
        player: build_player(settings),
    };
    practice.run(lines).await
}

async fn practice(settings: &Settings, file: Option<&Path>) -> Result<(), UtsushiError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let text = match file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => read_pasted_text(&mut lines).await?,
    };

    let mut session = PracticeSession::new()?;
    if session.load_text(&text) == 0 {
        print_error("No sentences to practice");
        return Ok(());
    }

    run_practice(settings, session, &mut lines).await
}

async fn lyrics(settings: &Settings, query: &str) -> Result<(), UtsushiError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let client = GeniusClient::from_settings(settings)?;
    let hits = client.search(query).await?;
    if hits.is_empty() {
        print_error("No songs found");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!("{:>3}. {}", i + 1, hit.full_title);
    }

    let song = loop {
        prompt("Song number: ");
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=hits.len()).contains(&n) => break &hits[n - 1],
            _ => print_error(format!("Pick a number between 1 and {}", hits.len())),
        }
    };

    let sentences = client.fetch_lyrics(song).await?;
    println!("{} lines, start typing!", sentences.len());

    let mut session = PracticeSession::new()?;
    session.load_sentences(sentences);
    run_practice(settings, session, &mut lines).await
}

async fn voices(settings: &Settings) -> Result<(), UtsushiError> {
    let catalog = build_catalog(settings);
    catalog.load_voices().await;
    println!("{}", render_voices(&catalog.selector()));
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load();
    tracing::debug!(path = %Settings::path().display(), "Settings loaded");

    let result = match &cli.command {
        Commands::Practice { file } => practice(&settings, file.as_deref()).await,
        Commands::Lyrics { query } => lyrics(&settings, &query.join(" ")).await,
        Commands::Voices => voices(&settings).await,
    };

    if let Err(e) = result {
        print_error(&e);
        std::process::exit(1);
    }
}
