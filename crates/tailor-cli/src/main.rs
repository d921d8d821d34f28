use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tailor_contracts::assets::{
    AssetStore, BackupStatus, RestoreStatus, TexturePaths, DEFAULT_TEXTURE_PATH, TEXTURE_SIZE,
};
use tailor_contracts::chat::{parse_intent, Intent, CHAT_HELP_LINES};
use tailor_contracts::events::{EventLog, SessionEvent};
use tailor_engine::{
    ApiKey, ClothingDescriber, EditOutcome, EditPipeline, EditRequest, GeminiClient,
    GeminiDescriber, GeminiSettings, GeminiSynthesizer, TextureSynthesizer,
};

#[derive(Debug, Parser)]
#[command(
    name = "tailor-rs",
    version,
    about = "Swap the torso clothing of a character texture using Gemini"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive loop: clothing photo paths, descriptions, `restore`, `quit`.
    Chat(ChatArgs),
    /// Apply a single edit and exit.
    Edit(EditArgs),
    /// Print the garment description of a clothing photo.
    Describe(DescribeArgs),
    /// Copy the backup back over the live texture.
    Restore(StoreArgs),
    /// Create the baseline backup if none exists yet.
    Backup(StoreArgs),
}

#[derive(Debug, Args)]
struct TextureArgs {
    #[arg(long, default_value = DEFAULT_TEXTURE_PATH)]
    texture: PathBuf,
    /// Defaults to `<texture stem>_backup.<ext>` next to the texture.
    #[arg(long)]
    backup: Option<PathBuf>,
    /// Defaults to `tailor-events.jsonl` next to the texture.
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct ChatArgs {
    #[command(flatten)]
    texture: TextureArgs,
}

#[derive(Debug, Parser)]
struct EditArgs {
    #[command(flatten)]
    texture: TextureArgs,
    #[arg(long, conflicts_with = "image", required_unless_present = "image")]
    text: Option<String>,
    #[arg(long)]
    image: Option<PathBuf>,
    /// Accept the derived description without asking.
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Parser)]
struct DescribeArgs {
    image: PathBuf,
}

#[derive(Debug, Parser)]
struct StoreArgs {
    #[command(flatten)]
    texture: TextureArgs,
}

const DESCRIPTION_PREVIEW_CHARS: usize = 200;

type GeminiPipeline = EditPipeline<GeminiDescriber, GeminiSynthesizer>;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("tailor-rs error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Chat(args) => run_chat(args),
        Command::Edit(args) => run_edit(args),
        Command::Describe(args) => run_describe(args),
        Command::Restore(args) => run_restore(args),
        Command::Backup(args) => run_backup(args),
    }
}

fn texture_paths(args: &TextureArgs) -> TexturePaths {
    match &args.backup {
        Some(backup) => TexturePaths::new(&args.texture, backup),
        None => TexturePaths::with_sibling_backup(&args.texture),
    }
}

/// Resolves the store and its log without touching the disk.
fn open_session(args: &TextureArgs) -> (AssetStore, EventLog) {
    let paths = texture_paths(args);
    let events_path = args
        .events
        .clone()
        .unwrap_or_else(|| paths.dir().join("tailor-events.jsonl"));
    let events = EventLog::new(events_path, uuid::Uuid::new_v4().to_string());
    (AssetStore::new(paths), events)
}

fn record_start(store: &AssetStore, events: &EventLog, command: &str) {
    let _ = events.record(&SessionEvent::SessionStarted {
        command: command.to_string(),
        texture: store.live_path().to_path_buf(),
        backup: store.backup_path().to_path_buf(),
    });
}

/// Opens a session on an existing texture. A missing texture is reported and
/// nothing is written.
fn open_existing(args: &TextureArgs, command: &str) -> Option<(AssetStore, EventLog)> {
    let (store, events) = open_session(args);
    if !store.has_live() {
        println!("Texture file not found: {}", store.live_path().display());
        println!("Please ensure the file exists before running");
        return None;
    }
    record_start(&store, &events, command);
    Some((store, events))
}

fn gemini_client() -> Result<GeminiClient> {
    let api_key = ApiKey::from_env()?;
    Ok(GeminiClient::new(GeminiSettings::from_env(), api_key))
}

fn build_pipeline(
    client: GeminiClient,
    store: AssetStore,
    events: EventLog,
) -> GeminiPipeline {
    EditPipeline::new(
        store,
        GeminiDescriber::new(client.clone()),
        GeminiSynthesizer::new(client),
        events,
    )
}

fn run_chat(args: ChatArgs) -> Result<i32> {
    println!("{}", "=".repeat(50));
    println!("Avatar clothing change - AI torso replacement");
    println!("{}", "=".repeat(50));

    let client = gemini_client()?;
    let Some((store, events)) = open_existing(&args.texture, "chat") else {
        return Ok(1);
    };
    let mut pipeline = build_pipeline(client, store, events);
    if !pipeline.store().has_backup() {
        println!("First run, creating texture backup...");
    }
    if pipeline.ensure_backup()? == BackupStatus::Created {
        println!(
            "Original texture backed up to: {}",
            pipeline.store().backup_path().display()
        );
    }

    println!();
    println!("Usage:");
    for line in CHAT_HELP_LINES {
        println!("  {line}");
    }
    println!();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("Input > ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        match parse_intent(&line, Path::is_file) {
            Intent::Noop => continue,
            Intent::Quit => {
                println!("Goodbye!");
                break;
            }
            Intent::Help => {
                for help_line in CHAT_HELP_LINES {
                    println!("  {help_line}");
                }
            }
            Intent::Restore => {
                restore_in_chat(&pipeline);
            }
            Intent::Image(path) => {
                println!("\nImage file detected: {}", path.display());
                println!("Analyzing uploaded clothing image...");
                let outcome = pipeline.run(EditRequest::Image(path), &mut confirm_on_stdin);
                report_outcome(&outcome);
            }
            Intent::Text(text) => {
                println!("\nUsing text description: {text}");
                announce_synthesis(&text);
                let outcome = pipeline.run(EditRequest::Text(text), &mut confirm_on_stdin);
                report_outcome(&outcome);
            }
        }
    }
    Ok(0)
}

/// Restores from the chat loop. Failures are reported and the session keeps going.
fn restore_in_chat<D, S>(pipeline: &EditPipeline<D, S>) -> bool
where
    D: ClothingDescriber,
    S: TextureSynthesizer,
{
    match pipeline.restore() {
        Ok(status) => {
            report_restore(status);
            status == RestoreStatus::Restored
        }
        Err(err) => {
            println!("\nRestore failed ({}): {}", err.stage(), err.reason());
            false
        }
    }
}

fn run_edit(args: EditArgs) -> Result<i32> {
    let client = gemini_client()?;
    let Some((store, events)) = open_existing(&args.texture, "edit") else {
        return Ok(1);
    };
    let mut pipeline = build_pipeline(client, store, events);

    let request = match (args.image, args.text) {
        (Some(path), _) => {
            if !path.is_file() {
                bail!("clothing image not found: {}", path.display());
            }
            EditRequest::Image(path)
        }
        (None, Some(text)) => {
            announce_synthesis(&text);
            EditRequest::Text(text)
        }
        (None, None) => bail!("either --text or --image is required"),
    };
    let auto_accept = args.yes;
    let outcome = pipeline.run(request, &mut |description: &str| {
        if auto_accept {
            print_description(description);
            true
        } else {
            confirm_on_stdin(description)
        }
    });
    report_outcome(&outcome);
    Ok(if outcome.is_committed() { 0 } else { 1 })
}

fn run_describe(args: DescribeArgs) -> Result<i32> {
    let describer = GeminiDescriber::new(gemini_client()?);
    match describer.describe(&args.image) {
        Ok(description) => {
            println!("{description}");
            Ok(0)
        }
        Err(err) => {
            eprintln!("Unable to analyze image ({}): {}", err.stage(), err.reason());
            Ok(1)
        }
    }
}

fn run_restore(args: StoreArgs) -> Result<i32> {
    let (store, events) = open_session(&args.texture);
    if !store.has_backup() {
        report_restore(RestoreStatus::NothingToRestore);
        return Ok(0);
    }
    record_start(&store, &events, "restore");
    let status = store.restore()?;
    let _ = events.record(&match status {
        RestoreStatus::Restored => SessionEvent::TextureRestored {
            texture: store.live_path().to_path_buf(),
            backup: store.backup_path().to_path_buf(),
        },
        RestoreStatus::NothingToRestore => SessionEvent::RestoreSkipped,
    });
    report_restore(status);
    Ok(0)
}

fn run_backup(args: StoreArgs) -> Result<i32> {
    let Some((store, events)) = open_existing(&args.texture, "backup") else {
        return Ok(1);
    };
    match store.backup()? {
        BackupStatus::Created => {
            let _ = events.record(&SessionEvent::BackupCreated {
                backup: store.backup_path().to_path_buf(),
                sha256: None,
            });
            println!(
                "Original texture backed up to: {}",
                store.backup_path().display()
            );
        }
        BackupStatus::AlreadyPresent => {
            println!("Backup already exists: {}", store.backup_path().display())
        }
        BackupStatus::NoLiveAsset => {
            println!("Texture file not found: {}", store.live_path().display());
            return Ok(1);
        }
    }
    Ok(0)
}

fn announce_synthesis(description: &str) {
    println!("AI is replacing the clothing part...");
    println!("   Target clothing: {description}");
    println!("   (AI identifies the clothing area and keeps other parts unchanged)");
}

fn print_description(description: &str) {
    println!("\nAI's understanding of clothing features:");
    println!("   {description}");
}

/// Shows the derived description and asks for a y/n answer. Read failures cancel.
fn confirm_on_stdin(description: &str) -> bool {
    println!("Clothing analysis completed:");
    println!("  {}", preview(description, DESCRIPTION_PREVIEW_CHARS));
    print_description(description);
    print!("\nUse this description to generate clothing? (y/n) > ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => {
            let accepted = is_affirmative(&answer);
            if accepted {
                announce_synthesis(description);
            }
            accepted
        }
        Err(_) => false,
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect::<String>() + "..."
}

fn report_outcome(outcome: &EditOutcome) {
    match outcome {
        EditOutcome::Committed {
            raw_width,
            raw_height,
            resized,
            backup_created,
            ..
        } => {
            if *backup_created {
                println!("Created baseline backup before editing");
            }
            if *resized {
                println!(
                    "Resized image from {raw_width}x{raw_height} to {TEXTURE_SIZE}x{TEXTURE_SIZE}"
                );
            }
            println!("\nClothing change complete! Texture updated");
            println!("   Please refresh the viewer to see the effect");
            println!("   If not satisfied, enter 'restore' to revert");
        }
        EditOutcome::Cancelled { .. } => println!("Cancelled"),
        EditOutcome::Failed { stage, reason } => {
            println!("\nClothing change failed ({stage}): {reason}");
        }
    }
}

fn report_restore(status: RestoreStatus) {
    match status {
        RestoreStatus::Restored => println!("Original texture restored"),
        RestoreStatus::NothingToRestore => println!("Nothing to restore: no backup found"),
    }
}
