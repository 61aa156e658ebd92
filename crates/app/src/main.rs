mod intent;
mod render;
mod sink;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use lesson_core::model::Topic;
use services::{ConceptCache, DEFAULT_CAPACITY, GeminiProvider, LessonSession, LessonView};

use crate::intent::Intent;
use crate::sink::PacedSink;

/// Picture flashcards for toddlers, generated on demand.
#[derive(Debug, Parser)]
#[command(name = "lesson", version, about)]
struct Args {
    /// Number of generated cards kept in memory.
    #[arg(long, env = "LEARN_CACHE_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    cache_capacity: usize,

    /// Topic to open on launch (slug or label).
    #[arg(long, env = "LEARN_TOPIC")]
    topic: Option<Topic>,

    /// Write every spoken clip here as a WAV file.
    #[arg(long, env = "LEARN_AUDIO_DIR")]
    audio_dir: Option<PathBuf>,

    /// Write every card picture here.
    #[arg(long, env = "LEARN_IMAGE_DIR")]
    image_dir: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("app=info,services=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

struct Front {
    session: LessonSession,
    image_dir: Option<PathBuf>,
}

impl Front {
    fn show(&self, view: &LessonView) {
        let image_path = self.image_dir.as_deref().and_then(|dir| {
            let item = view.item.as_deref()?;
            let image = item.image()?;
            render::save_image(dir, item, image)
                .inspect_err(|err| warn!(error = %err, "could not save picture"))
                .ok()
        });
        print!("{}", render::lesson(view, image_path.as_deref()));
    }

    /// Apply one intent. Returns `false` when the user asked to leave.
    async fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Topics => print!("{}", render::topics()),
            Intent::Help => print!("{}", render::help()),
            Intent::Select(topic) => {
                info!(%topic, "topic selected");
                // Failures land in the view's error line.
                let _ = self.session.select_topic(topic).await;
                self.show(&self.session.view());
            }
            Intent::Next => {
                if let Err(err) = self.session.next().await {
                    if self.session.topic().is_none() {
                        println!("{err}. Pick a topic first.");
                        return true;
                    }
                }
                self.show(&self.session.view());
            }
            Intent::Previous => {
                if !self.session.previous() {
                    println!("This is the first card.");
                }
                self.show(&self.session.view());
            }
            Intent::Reveal => {
                self.session.toggle_reveal();
                self.show(&self.session.view());
            }
            Intent::Listen => {
                if !self.session.pronounce_current().await {
                    println!("Reveal the answer first.");
                }
            }
            Intent::Exit => {
                self.session.exit();
                self.show(&self.session.view());
            }
            Intent::Quit => return false,
        }
        true
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    for dir in [&args.audio_dir, &args.image_dir].into_iter().flatten() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let provider = GeminiProvider::from_env();
    if !provider.enabled() {
        warn!("LEARN_AI_API_KEY is not set; every card will fail to load");
    }

    let cache = Arc::new(ConceptCache::new(args.cache_capacity));
    info!(capacity = cache.capacity(), "concept cache ready");

    let mut front = Front {
        session: LessonSession::new(
            Arc::new(provider),
            cache,
            Arc::new(PacedSink::new(args.audio_dir)),
        ),
        image_dir: args.image_dir,
    };

    match args.topic {
        Some(topic) => {
            front.apply(Intent::Select(topic)).await;
        }
        None => print!("{}", render::topics()),
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let keep_going = match Intent::parse(&line) {
            Ok(intent) => front.apply(intent).await,
            Err(intent::IntentError::Empty) => true,
            Err(err) => {
                println!("{err}");
                true
            }
        };
        if !keep_going {
            break;
        }
    }

    front.session.exit();
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn capacity_defaults_to_two_hundred() {
        let args = Args::try_parse_from(["lesson"]).unwrap();
        assert_eq!(args.cache_capacity, 200);
        assert!(args.topic.is_none());
    }

    #[test]
    fn topic_flag_accepts_slug() {
        let args = Args::try_parse_from(["lesson", "--topic", "farm"]).unwrap();
        assert_eq!(args.topic, Some(Topic::FarmAnimals));
    }
}
