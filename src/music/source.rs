use serde::Deserialize;
use tokio::process::Command;

use super::Song;
use crate::Error;

#[derive(Deserialize)]
struct YtDlpOutput {
    title: Option<String>,
    duration: Option<f64>,
    webpage_url: Option<String>,
    original_url: Option<String>,
}

fn format_duration(secs: f64) -> String {
    let secs = secs as u64;
    let (hours, rest) = (secs / 3600, secs % 3600);
    let (mins, secs) = (rest / 60, rest % 60);
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

/// Resolves a URL or search phrase to a playable song using `yt-dlp`.
pub async fn get_song_info(query: &str) -> Result<Song, Error> {
    let is_url = query.starts_with("http://") || query.starts_with("https://");
    let search_query = if is_url {
        query.to_string()
    } else {
        format!("ytsearch1:{query}")
    };

    let output = Command::new("yt-dlp")
        .args([
            "-j",
            "-f",
            "bestaudio/best",
            "--no-playlist",
            "--no-warnings",
            &search_query,
        ])
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("yt-dlp error: {}", stderr.trim()).into());
    }

    let info: YtDlpOutput = serde_json::from_slice(&output.stdout)?;

    let url = info
        .webpage_url
        .or(info.original_url)
        .unwrap_or_else(|| query.to_string());

    Ok(Song {
        title: info.title.unwrap_or_else(|| "Unknown".to_string()),
        url,
        duration: info.duration.map(format_duration),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(212.0), "3:32");
        assert_eq!(format_duration(3723.0), "1:02:03");
    }
}
