use serenity::builder::{CreateEmbed, CreateEmbedFooter};

use crate::gametime;
use crate::music::Song;
use crate::poll::{PollOption, Tally};
use crate::queue::Task;

const BLUE: u32 = 0x3498DB;
const GREEN: u32 = 0x1DB954;
const RED: u32 = 0xED4245;

/// Discord caps embeds at 25 fields.
pub const FIELDS_PER_EMBED: usize = 25;

pub fn now_playing(song: &Song, requester: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(format!("[{}]({})", song.title, song.url))
        .color(GREEN);

    if let Some(ref dur) = song.duration {
        embed = embed.field("Length", dur, true);
    }

    embed.field("Requested by", requester, true)
}

pub fn added_to_queue(song: &Song, position: usize) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("✅ Queued up")
        .description(format!("[{}]({})", song.title, song.url))
        .color(BLUE);

    if let Some(ref dur) = song.duration {
        embed = embed.field("Length", dur, true);
    }

    embed.field("Position", format!("#{position}"), true)
}

fn task_line(task: &Task) -> String {
    match task.song() {
        Some(song) => {
            let dur = song
                .duration
                .as_ref()
                .map_or(String::new(), |d| format!(" `{d}`"));
            format!("[{}]({}){dur}", song.title, song.url)
        }
        None => task.title().to_string(),
    }
}

pub fn queue_list(current: Option<&Task>, tasks: &[Task], page: usize) -> CreateEmbed {
    let per_page = 10;
    let total_pages = tasks.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let mut description = String::new();

    if let Some(task) = current {
        description.push_str(&format!("**Now playing:** {}\n\n", task_line(task)));
    }

    if tasks.is_empty() {
        description.push_str("The queue is empty.");
    } else {
        let start = (page - 1) * per_page;
        let end = (start + per_page).min(tasks.len());

        for (i, task) in tasks[start..end].iter().enumerate() {
            description.push_str(&format!("**{}.** {}\n", start + i + 1, task_line(task)));
        }
    }

    CreateEmbed::new()
        .title(format!("📋 Queue ({page}/{total_pages})"))
        .description(description)
        .color(BLUE)
        .footer(CreateEmbedFooter::new(format!("{} queued", tasks.len())))
}

pub fn poll_choices(options: &[PollOption]) -> CreateEmbed {
    let description: String = options
        .iter()
        .map(|o| format!("{} {}\n", o.emoji, o.label))
        .collect();

    CreateEmbed::new().description(description).color(BLUE)
}

pub fn poll_results(question: &str, tally: &[Tally]) -> CreateEmbed {
    let total: u64 = tally.iter().map(|t| t.votes).sum();
    let description: String = tally
        .iter()
        .map(|t| {
            let pct = if total == 0 { 0 } else { t.votes * 100 / total };
            format!("{} {}: **{}** ({pct}%)\n", t.option.emoji, t.option.label, t.votes)
        })
        .collect();

    CreateEmbed::new()
        .title(format!("📊 Results: {question}"))
        .description(description)
        .color(BLUE)
        .footer(CreateEmbedFooter::new(format!("{total} votes")))
}

/// One page of a user's game times. `games` holds at most [`FIELDS_PER_EMBED`] entries.
pub fn game_times(games: &[(String, u64)], page: usize, pages: usize) -> CreateEmbed {
    games.iter().fold(
        CreateEmbed::new()
            .title(format!("Time Played (On Discord) 🎮 {page}/{pages}"))
            .color(BLUE),
        |embed, (game, secs)| embed.field(game, gametime::format_duration(*secs), false),
    )
}

pub fn about(version: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("PooperScooper")
        .description("A personal bot made for fun and scooping your poop.")
        .field("Version", format!("PooperScooper {version}"), true)
        .field("Author", "Kommotion", true)
        .field(
            "Github Link",
            "[https://github.com/Kommotion/PooperScooper](https://github.com/Kommotion/PooperScooper)",
            false,
        )
        .field("Library", "[poise](https://github.com/serenity-rs/poise)", true)
        .field("Language", "Rust", true)
        .footer(CreateEmbedFooter::new(
            "In memory of all the good boys and girls - Junior, Cole, and Shirley.",
        ))
        .color(BLUE)
}

pub fn grammar_police(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Grammar Police 🚨")
        .description(message)
        .color(BLUE)
}

pub fn error(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Error")
        .description(message)
        .color(RED)
}
