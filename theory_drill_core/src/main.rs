// Theory Drill: terminal front end.
//
// Runs quizzes on stdin/stdout against a JSON store of practice history
// and topic weights, and exposes the recommender and the question
// diagnostics as subcommands.
//
// Usage:
//   cargo run -p theory_drill_core --bin drill -- [--store PATH] [--user NAME]
//     [--config PATH] [--seed N] <COMMAND>
//
// Commands: topics, quiz, diagnose, recommend, set-weight, stats.
// Logging goes to stderr; set RUST_LOG (default `warn`) for more.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use theory_drill_core::recommend::{self, PracticeRecord};
use theory_drill_core::store::{
    HistoryRepository, JsonFileStore, WeightRepository, apply_recommendation,
};
use theory_drill_core::{
    Category, Drill, DrillConfig, QuizSession, Result, Topic, TopicSelection, Verdict,
    default_tables,
};
use theory_drill_prng::DrillRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "drill", about = "Music theory drills with adaptive topic weighting")]
struct Cli {
    /// JSON file holding practice history and topic weights.
    #[arg(long, default_value = "drill_store.json")]
    store: PathBuf,

    /// Whose history to record and read.
    #[arg(long, default_value = "default")]
    user: String,

    /// Drill configuration (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config seed.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every topic with its stored weight.
    Topics,
    /// Answer questions interactively.
    Quiz {
        /// Topic as "Category/Subcategory".
        #[arg(long, conflicts_with = "weighted")]
        topic: Option<String>,
        /// Draw each question's topic by stored weight (the default).
        #[arg(long)]
        weighted: bool,
        /// Questions in the session.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one generated question with its answer key.
    Diagnose {
        #[arg(long)]
        topic: String,
    },
    /// Compute recommended weights from practice history.
    Recommend {
        #[arg(long)]
        window_days: Option<u32>,
        /// Store the recommended weights.
        #[arg(long)]
        apply: bool,
    },
    /// Override one topic's weight.
    SetWeight {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        weight: f64,
    },
    /// Solved/accuracy totals per category.
    Stats {
        #[arg(long)]
        window_days: Option<u32>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DrillConfig::load(path)?,
        None => DrillConfig::default(),
    };
    let mut store = JsonFileStore::open(&cli.store)?;
    let rng = match cli.seed.or(config.seed) {
        Some(seed) => DrillRng::new(seed),
        None => DrillRng::from_time(),
    };
    let mut drill = Drill::new(default_tables(), rng).with_weights(store.load_weights()?);

    match cli.command {
        Command::Topics => {
            for category in Category::ALL {
                println!("{category}");
                for topic in category.topics() {
                    println!("  {:<20} {:>5.2}", topic.subcategory(), drill.weights().get(topic));
                }
            }
        }
        Command::Quiz { topic, weighted: _, limit } => {
            let selection = match topic {
                Some(key) => TopicSelection::Fixed(Topic::parse_key(&key)?),
                None => TopicSelection::Weighted,
            };
            let limit = limit.unwrap_or(config.session.limit);
            quiz(&mut drill, &mut store, &cli.user, &config, selection, limit)?;
        }
        Command::Diagnose { topic } => {
            let topic = Topic::parse_key(&topic)?;
            let question = drill.generate(topic);
            println!("Topic:     {topic}");
            println!("Prompt:    {}", question.prompt);
            println!("Kind:      {:?}", question.kind);
            println!("Mode:      {:?}", question.mode());
            println!("Spelling:  {:?}", question.spelling);
            println!("Answers:   {}", question.answers);
        }
        Command::Recommend { window_days, apply } => {
            let mut policy = config.recommender.clone();
            if let Some(days) = window_days {
                policy.window_days = days;
            }
            let now = Utc::now();
            let history = store.load_all(&cli.user)?;
            let features = recommend::topic_features(&history, now, policy.window_days);
            let weights = recommend::recommend(&history, now, &policy);
            println!(
                "{:<36} {:>6} {:>6} {:>6} {:>6} {:>5} {:>7} {:>7}",
                "topic", "solved", "acc%", "recent", "rec%", "wrong", "current", "recomm."
            );
            for (topic, f) in recommend::ranked(&features, &policy) {
                println!(
                    "{:<36} {:>6} {:>6.1} {:>6} {:>6.1} {:>5} {:>7.2} {:>7.2}",
                    topic.to_string(),
                    f.solved,
                    f.accuracy,
                    f.recent_solved,
                    f.recent_accuracy,
                    f.wrong_streak,
                    drill.weights().get(topic),
                    weights.get(&topic).copied().unwrap_or(policy.base),
                );
            }
            if apply {
                apply_recommendation(&mut store, &weights, &cli.user, now)?;
                println!("Applied {} weights to {}.", weights.len(), store.path().display());
            }
        }
        Command::SetWeight { topic, weight } => {
            let topic = Topic::parse_key(&topic)?;
            store.upsert(topic, weight, &cli.user, Utc::now())?;
            println!("{topic}: {:.2}", store.load_weights()?.get(topic));
        }
        Command::Stats { window_days } => {
            let history = store.load_all(&cli.user)?;
            let summary = recommend::summarize(&history, Utc::now(), window_days);
            println!("Solved {} with {:.1}% accuracy", summary.solved, summary.accuracy());
            for stats in summary.by_category.iter().filter(|s| s.solved > 0) {
                println!(
                    "  {:<12} {:>5} solved {:>6.1}%",
                    stats.category.name(),
                    stats.solved,
                    stats.accuracy()
                );
            }
        }
    }
    Ok(())
}

fn quiz(
    drill: &mut Drill,
    history: &mut impl HistoryRepository,
    user: &str,
    config: &DrillConfig,
    selection: TopicSelection,
    limit: usize,
) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut session = QuizSession::new(user, config.session.clone());
    session.start(drill, selection, limit);

    loop {
        if !play(drill, &mut session, &mut lines, |record| history.append(record))? {
            return Ok(());
        }
        if !session.is_retry() {
            println!("\nScore: {}/{}", session.score(), session.limit());
        }
        let Some(retry) = session.retry_session() else {
            return Ok(());
        };
        print!("Retry {} missed question(s)? [y/N] ", retry.limit());
        io::stdout().flush()?;
        match lines.next().transpose()? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => session = retry,
            _ => return Ok(()),
        }
    }
}

/// Run one session to its end. Returns `false` if input ran out first.
fn play(
    drill: &mut Drill,
    session: &mut QuizSession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    mut record: impl FnMut(PracticeRecord) -> Result<()>,
) -> Result<bool> {
    while let Some(question) = session.current() {
        if session.misses() == 0 {
            println!(
                "\n[{}/{}] {} / {}",
                session.progress() + 1,
                session.limit(),
                question.category,
                question.subcategory
            );
            println!("{}", question.prompt);
        }
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(false);
        };
        let Some(attempt) = session.submit(drill, &line, Utc::now()) else {
            break;
        };
        match attempt.verdict {
            Verdict::Correct => println!("Correct."),
            Verdict::Incorrect { misses_left } => {
                println!("Not quite ({misses_left} tries left).")
            }
            Verdict::GaveUp { answers } => println!("Answer: {answers}"),
        }
        if let Some(r) = attempt.record {
            record(r)?;
        }
    }
    Ok(true)
}
