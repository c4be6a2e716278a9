//! Subcommands and their output.
use anyhow::{Result, bail};
use arise_content::{Translator, format_number};
use arise_core::utils::xp_required;
use arise_core::{GameState, SnapshotKind};
use arise_runtime::cache::AssetRequest;
use arise_runtime::{Runtime, RuntimeError, RuntimeHandle, SyncReport};
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Village, farm and sync overview
    Status,
    /// Plant a crop for a subject
    Plant { subject: String, crop_type: String },
    /// Water a crop (+20 health, up to 100)
    Water { crop_id: String },
    /// Harvest a crop and collect its points
    Harvest { crop_id: String },
    /// Advance crop growth to now
    Grow,
    /// Complete a village quest
    Quest { quest_id: String },
    /// Spend skill points on a skill
    Skill { skill_id: String },
    /// Redeem a reward from the store
    Redeem { reward_id: String },
    /// Record a mini-game score
    Score { game_id: String, score: u32 },
    /// Count today towards the daily streak
    Streak,
    /// Push queued actions to the server now
    Sync,
    /// List stored snapshots of one sub-state
    Snapshots { kind: SnapshotKind },
    /// Look up a translation key such as `progress.level`
    Translate { key: String },
    /// Offline lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommand,
    },
    /// Offline asset cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LessonCommand {
    Download {
        lesson_id: String,
    },
    Progress {
        lesson_id: String,
        #[arg(long)]
        completed: bool,
        #[arg(long)]
        score: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Precache the app shell and game assets
    Install,
    /// Request an origin-relative path through the cache
    Fetch { path: String },
}

pub async fn run(command: Command, runtime: &Runtime, translator: &Translator) -> Result<()> {
    let handle = runtime.handle();

    match command {
        Command::Status => print_status(&handle, translator).await?,
        Command::Plant { subject, crop_type } => {
            let crop_id = handle.plant_crop(subject, crop_type).await?;
            println!("planted {crop_id}");
        }
        Command::Water { crop_id } => {
            handle.water_crop(crop_id.as_str()).await?;
            let state = handle.query_state().await?;
            match state.crop(&crop_id) {
                Some(crop) => println!("{crop_id}: health {}", crop.health),
                None => println!("no crop {crop_id}"),
            }
        }
        Command::Harvest { crop_id } => {
            let value = handle.harvest_crop(crop_id).await?;
            println!("harvested {value} points");
        }
        Command::Grow => {
            handle.update_crop_growth().await?;
            print_crops(&handle.query_state().await?);
        }
        Command::Quest { quest_id } => {
            handle.complete_quest(quest_id).await?;
            handle.check_level_up().await?;
            let state = handle.query_state().await?;
            println!(
                "{} {}",
                translator.t("progress.level"),
                state.village.level
            );
        }
        Command::Skill { skill_id } => {
            if handle.unlock_skill(skill_id.as_str()).await? {
                println!("unlocked {skill_id}");
            } else {
                bail!("cannot unlock {skill_id}");
            }
        }
        Command::Redeem { reward_id } => {
            if handle.redeem_reward(reward_id.as_str()).await? {
                println!("redeemed {reward_id}");
            } else {
                bail!("cannot redeem {reward_id}");
            }
        }
        Command::Score { game_id, score } => {
            handle.record_game_score(game_id.as_str(), score).await?;
            let state = handle.query_state().await?;
            println!(
                "{game_id}: best {}",
                state.mini_games.high_score(&game_id)
            );
        }
        Command::Streak => {
            handle.update_daily_streak().await?;
            let state = handle.query_state().await?;
            println!(
                "{} {}",
                translator.t("progress.dayStreak"),
                state.farm.daily_streak
            );
        }
        Command::Sync => match handle.force_sync().await {
            Ok(report) => print_report(&report),
            Err(RuntimeError::Offline) => {
                let pending = handle.pending_actions().await?.len();
                println!("offline, {pending} actions waiting");
            }
            Err(error) => return Err(error.into()),
        },
        Command::Snapshots { kind } => {
            for snapshot in handle.load_game_state(kind)? {
                let marker = if snapshot.sync_required { "*" } else { " " };
                println!("{marker} {} at {}", snapshot.id, snapshot.timestamp);
            }
        }
        Command::Translate { key } => println!("{}", translator.t(&key)),
        Command::Lesson { action } => match action {
            LessonCommand::Download { lesson_id } => {
                let lesson = handle.download_lesson(&lesson_id).await?;
                println!("downloaded {} ({})", lesson.id, lesson.title);
            }
            LessonCommand::Progress {
                lesson_id,
                completed,
                score,
            } => {
                let queued = handle
                    .record_lesson_progress(lesson_id, completed, score)
                    .await?;
                println!("queued {}", queued.id);
            }
        },
        Command::Cache { action } => {
            let cache = runtime.asset_cache();
            match action {
                CacheCommand::Install => {
                    cache.install().await?;
                    println!("assets cached");
                }
                CacheCommand::Fetch { path } => {
                    let url = cache.manifest().resolve(&path);
                    let response = cache.fetch(&AssetRequest::get(url.as_str())).await?;
                    println!("{url}: {} ({} bytes)", response.status, response.body.len());
                }
            }
        }
    }

    Ok(())
}

async fn print_status(handle: &RuntimeHandle, translator: &Translator) -> Result<()> {
    let state = handle.query_state().await?;
    let stats = handle.offline_stats().await?;
    let language = translator.language();

    println!(
        "{} {} (next at {} points)",
        translator.t("progress.level"),
        state.village.level,
        xp_required(state.village.level + 1)
    );
    println!(
        "{} {}",
        translator.t("progress.totalPoints"),
        format_number(i64::from(state.rewards.points), language)
    );
    println!(
        "{} {}",
        translator.t("progress.dayStreak"),
        state.farm.daily_streak
    );
    println!("skill points {}", state.skills.skill_points);
    print_crops(&state);

    let connection = if handle.is_online() { "online" } else { "offline" };
    println!(
        "{connection}: {} pending, {} snapshots, last sync {}",
        stats.pending_actions,
        stats.total_snapshots,
        stats
            .last_sync
            .map_or_else(|| "never".to_owned(), |at| at.to_string())
    );
    Ok(())
}

fn print_crops(state: &GameState) {
    for crop in &state.farm.crops {
        let status = if crop.is_withered {
            "withered".to_owned()
        } else {
            format!("{}, health {}", crop.stage(), crop.health)
        };
        println!("{} {} ({}): {status}", crop.id, crop.crop_type, crop.subject_id);
    }
}

fn print_report(report: &SyncReport) {
    println!(
        "synced {} of {}, {} retrying, {} abandoned, {} left",
        report.acknowledged.len(),
        report.attempted,
        report.retried.len(),
        report.abandoned.len(),
        report.remaining
    );
    for letter in &report.abandoned {
        println!("  gave up on {} ({}): {}", letter.action.id, letter.action.kind, letter.reason);
    }
}
