// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use resume_qna::utils::logging::{format_info, format_step, format_success, format_warning};
use resume_qna::{
    BatchGenerator, Config, GoogleTranslateTts, GroqChatClient, OutputWriter, ProgressSink,
    ProgressTracker, QnaBuilder, TopicExtractor, TopicTree, Validator, extract_text,
    synthesize_tree, zip_dir, zip_files,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const TOTAL_STEPS: usize = 5;

#[derive(Parser)]
#[command(name = "resume_qna")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Interview Q&A text, audio and archives generated from a resume", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text extracted from a resume file
    Extract { file: PathBuf },

    /// Build the topic tree for a resume
    Topics {
        file: PathBuf,

        /// Write the tree as JSON instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long, value_name = "NUM")]
        max_topics: Option<usize>,
    },

    /// Run the full pipeline: topics, Q&A files, audio and archives
    Generate {
        file: PathBuf,

        /// Reuse a topic tree saved by the topics command
        #[arg(long, value_name = "FILE")]
        topics: Option<PathBuf>,

        #[arg(long, value_name = "NUM")]
        max_topics: Option<usize>,

        #[arg(long)]
        no_audio: bool,

        #[arg(long)]
        no_archive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    resume_qna::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Resume interview Q&A generator");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Extract { file } => {
            cmd_extract(&file)?;
        }
        Commands::Topics {
            file,
            output,
            max_topics,
        } => {
            cmd_topics(&config, &file, output, max_topics, cli.color).await?;
        }
        Commands::Generate {
            file,
            topics,
            max_topics,
            no_audio,
            no_archive,
        } => {
            let options = GenerateOptions {
                topics,
                max_topics,
                audio: !no_audio && config.speech.enabled,
                archive: !no_archive,
                colored: cli.color,
            };
            cmd_generate(&config, &file, options).await?;
        }
    }

    Ok(())
}

struct GenerateOptions {
    topics: Option<PathBuf>,
    max_topics: Option<usize>,
    audio: bool,
    archive: bool,
    colored: bool,
}

fn read_resume(file: &Path) -> Result<String> {
    let text = extract_text(file)
        .with_context(|| format!("Failed to extract text from {}", file.display()))?;
    Validator::validate_content_not_empty(&text)
        .with_context(|| format!("No text found in {}", file.display()))?;
    Ok(text)
}

fn cmd_extract(file: &Path) -> Result<()> {
    let text = read_resume(file)?;
    println!("{}", text);
    Ok(())
}

async fn build_topics(
    config: &Config,
    client: &GroqChatClient,
    resume_text: &str,
    max_topics: Option<usize>,
    colored: bool,
) -> TopicTree {
    let extractor =
        TopicExtractor::new(client).with_max_chunk_chars(config.generation.max_chunk_chars);
    let tracker = ProgressTracker::with_color("Topics", colored);

    let mut tree = extractor
        .extract(resume_text, Some(&tracker as &dyn ProgressSink))
        .await;
    tracker.finish();

    if let Some(limit) = max_topics.or(config.generation.max_topics) {
        tree.truncate(limit);
    }
    tree
}

async fn cmd_topics(
    config: &Config,
    file: &Path,
    output: Option<PathBuf>,
    max_topics: Option<usize>,
    colored: bool,
) -> Result<()> {
    let resume_text = read_resume(file)?;
    let client = GroqChatClient::new(&config.llm).context("Failed to create model client")?;

    let tree = build_topics(config, &client, &resume_text, max_topics, colored).await;
    let json = serde_json::to_string_pretty(&tree)?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                format_success(&format!(
                    "Saved {} topic(s) / {} unit(s) to {}",
                    tree.topics().len(),
                    tree.unit_count(),
                    path.display()
                ))
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn load_topics(path: &Path, max_topics: Option<usize>) -> Result<TopicTree> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read topic tree {}", path.display()))?;
    let mut tree: TopicTree = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid topic tree in {}", path.display()))?;
    if let Some(limit) = max_topics {
        tree.truncate(limit);
    }
    Ok(tree)
}

/// First Ctrl-C requests a cooperative stop; a second one exits at once.
fn spawn_stop_listener() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received; finishing the current unit (Ctrl-C again to quit)");
        flag.store(true, Ordering::SeqCst);

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Second interrupt received; exiting");
            std::process::exit(130);
        }
    });

    stop
}

async fn cmd_generate(config: &Config, file: &Path, options: GenerateOptions) -> Result<()> {
    let start_time = Instant::now();

    println!("{}", format_step(1, TOTAL_STEPS, "Extracting resume text"));
    let resume_text = read_resume(file)?;

    let client = GroqChatClient::new(&config.llm).context("Failed to create model client")?;

    println!("{}", format_step(2, TOTAL_STEPS, "Building topic tree"));
    let max_topics = options.max_topics.or(config.generation.max_topics);
    let tree = match &options.topics {
        Some(path) => load_topics(path, max_topics)?,
        None => build_topics(config, &client, &resume_text, max_topics, options.colored).await,
    };
    println!(
        "{}",
        format_info(&format!(
            "{} topic(s), {} unit(s)",
            tree.topics().len(),
            tree.unit_count()
        ))
    );

    println!("{}", format_step(3, TOTAL_STEPS, "Generating Q&A files"));
    let writer = OutputWriter::new(&config.output.text_dir);
    if config.output.clean_before_run {
        writer.reset().context("Failed to clear text output")?;
    }

    let builder = QnaBuilder::from_config(&client, &config.generation);
    let generator = BatchGenerator::new(writer).with_json(config.generation.write_json);

    let stop = spawn_stop_listener();
    let should_stop = || stop.load(Ordering::SeqCst);
    let tracker = ProgressTracker::with_color("Q&A", options.colored);

    let stats = generator
        .run(
            &tree,
            &resume_text,
            &builder,
            Some(&tracker as &dyn ProgressSink),
            Some(&should_stop as &dyn Fn() -> bool),
        )
        .await
        .context("Q&A generation failed")?;

    if stats.stopped {
        tracker.abandon("stopped");
    } else {
        tracker.finish();
    }

    let follow_up = stats.follow_up(options.audio, options.archive);

    println!("{}", format_step(4, TOTAL_STEPS, "Converting text to audio"));
    let audio_written = if follow_up.synthesize_audio {
        synthesize_audio(config, options.colored, &should_stop).await?
    } else {
        println!("{}", format_info("Audio skipped"));
        0
    };

    println!("{}", format_step(5, TOTAL_STEPS, "Creating archives"));
    let archives = if follow_up.build_archives {
        create_archives(config, audio_written > 0)?
    } else {
        println!("{}", format_info("Archives skipped"));
        Vec::new()
    };

    let summary = format!(
        "{}/{} unit(s) written ({} questions), {} failed, {} audio file(s), {} archive(s) in {:.2}s ({})",
        stats.succeeded,
        stats.total_units,
        stats.questions,
        stats.failed,
        audio_written,
        archives.len(),
        start_time.elapsed().as_secs_f64(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    if stats.stopped {
        println!("{}", format_warning(&format!("Stopped early: {}", summary)));
    } else {
        println!("{}", format_success(&summary));
    }
    for archive in &archives {
        println!("  {}", archive.display());
    }

    Ok(())
}

async fn synthesize_audio(
    config: &Config,
    colored: bool,
    should_stop: &dyn Fn() -> bool,
) -> Result<usize> {
    let audio_writer = OutputWriter::new(&config.output.audio_dir);
    audio_writer
        .reset()
        .context("Failed to clear audio output")?;

    let tts = GoogleTranslateTts::new(
        config.speech.endpoint.clone(),
        Duration::from_secs(config.speech.timeout_secs),
    )
    .context("Failed to create speech client")?;
    let tracker = ProgressTracker::with_color("Audio", colored);

    let written = synthesize_tree(
        &config.output.text_dir,
        audio_writer.root(),
        &tts,
        &config.speech.voice(),
        Some(&tracker as &dyn ProgressSink),
        Some(should_stop),
    )
    .await
    .context("Audio conversion failed")?;
    tracker.finish();

    Ok(written.len())
}

fn create_archives(config: &Config, include_audio: bool) -> Result<Vec<PathBuf>> {
    let output = &config.output;
    let mut archives = Vec::new();

    let text_zip = zip_dir(&output.text_dir, &output.text_archive_path())
        .context("Failed to archive text output")?;
    archives.push(text_zip);

    if include_audio {
        let audio_zip = zip_dir(&output.audio_dir, &output.audio_archive_path())
            .context("Failed to archive audio output")?;
        archives.push(audio_zip);
    }

    let combined = zip_files(&archives, &output.combined_archive_path())
        .context("Failed to create combined archive")?;
    archives.push(combined);

    Ok(archives)
}
