use clap::{Arg, ArgAction, Command};
use cuneiform_translator::{
    Direction, LookupTable, MockBackend, MockMode, Orchestrator, OrchestratorConfig,
    OrchestratorEvent, TRANSLATION_FAILED, TranslationResult, TranslatorView,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("cuneiform-translate")
        .version("0.1.0")
        .about("Translate cuneiform snippets using the phrase table and the prediction service")
        .arg(
            Arg::new("text")
                .help("Text to translate (reads lines from stdin when omitted)")
                .index(1),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .short('e')
                .help("Prediction service URL"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .short('t')
                .help("JSON phrase table to use instead of the built-in one"),
        )
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .help("Thinking delay before each translation, in milliseconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .help("Timeout for the prediction service, in seconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the mock backend instead of the prediction service")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .short('s')
                .help("List sample snippets for a direction and exit")
                .num_args(0..=1)
                .default_missing_value("cuneiform-to-english"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show debug logs")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = OrchestratorConfig::from_env()?;
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config.endpoint = endpoint.clone();
    }
    if let Some(ms) = matches.get_one::<u64>("delay-ms") {
        config.thinking_delay = Duration::from_millis(*ms);
    }
    if let Some(secs) = matches.get_one::<u64>("timeout-secs") {
        config.request_timeout = Duration::from_secs(*secs);
    }

    let table = match matches.get_one::<String>("table") {
        Some(path) => LookupTable::from_json_file(Path::new(path))?,
        None => LookupTable::builtin(),
    };

    if let Some(direction) = matches.get_one::<String>("samples") {
        let direction: Direction = direction.parse()?;
        for sample in table.samples(direction) {
            println!("{}", sample);
        }
        return Ok(());
    }

    let orchestrator = if matches.get_flag("mock") {
        config.validate()?;
        Orchestrator::new(
            Arc::new(table),
            Arc::new(MockBackend::new(MockMode::Echo)),
            &config,
        )
    } else {
        Orchestrator::from_config(table, &config)?
    };
    info!(
        backend = orchestrator.backend_name(),
        phrases = orchestrator.table().len(),
        "🏺 Translator ready"
    );

    match matches.get_one::<String>("text") {
        Some(text) => translate_once(&orchestrator, text).await,
        None => translate_lines(&orchestrator).await,
    }
}

async fn translate_once(
    orchestrator: &Orchestrator,
    text: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    orchestrator.submit(text).await?;

    let view = orchestrator.view();
    match view.result() {
        Some(result) if result.is_success() => {
            println!("{}", view.output_text);
            Ok(())
        }
        Some(TranslationResult::RemoteFailure(kind)) => {
            eprintln!("❌ {}", result_message(&view));
            Err(format!("{} failure", kind).into())
        }
        _ => Err("translation did not settle".into()),
    }
}

async fn translate_lines(orchestrator: &Orchestrator) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut events = orchestrator.events();
    let mut pending = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => pending = Some(orchestrator.submit(line)),
                None => break,
            },
            event = events.recv() => match event {
                Ok(event) => render(&event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Some(handle) = pending {
        handle.await?;
    }
    while let Ok(event) = events.try_recv() {
        render(&event);
    }
    Ok(())
}

fn render(event: &OrchestratorEvent) {
    match event {
        OrchestratorEvent::Loading { .. } => eprintln!("⏳ Translating..."),
        OrchestratorEvent::Settled { result, .. } => {
            if result.is_success() {
                println!("{}", result.output_text());
                eprintln!("✅ {}", result.notification_message());
            } else {
                eprintln!("❌ {}", result.notification_message());
            }
        }
        OrchestratorEvent::NotificationDismissed { .. } => {}
    }
}

fn result_message(view: &TranslatorView) -> &str {
    view.notification.message().unwrap_or(TRANSLATION_FAILED)
}
