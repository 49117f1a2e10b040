//! Console command parsing and event rendering
//!
//! One command per line; track ids are catalog ids, indexes are 0-based
//! queue positions.

use std::time::Duration;
use thiserror::Error;
use tune_core::TrackId;
use tune_playback::{PlaybackEvent, PlaybackSnapshot};
use tune_playback_desktop::PlaybackCommand;

/// Help text printed by the `help` command
pub const HELP: &str = "\
Commands:
  play <id>             play a track now (queue cursor stays put)
  at <index>            play the queue entry at <index>
  queue <id> [<id>...]  replace the queue
  add <id>              append to the queue
  remove <id>           remove the first occurrence from the queue
  clear                 empty the queue and stop
  toggle | p            pause / resume
  next | n              next track
  prev | b              previous track
  seek <secs> | <n>%    seek by time or percentage
  vol <0.0-1.0>         set volume
  loop on|off           loop the current track
  shuffle on|off        shuffle the queue
  stop                  stop, keep the queue
  status                show what is playing
  tracks                list the catalog
  help                  this text
  quit                  exit";

/// A parsed console line
#[derive(Debug)]
pub enum ConsoleCommand {
    /// Forward to the playback service
    Playback(PlaybackCommand),
    Status,
    Tracks,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },
}

/// Parse one console line; `Ok(None)` for blank lines
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "play" => PlaybackCommand::PlayTrack(single(&args, "play <id>").and_then(track_id)?),
        "at" => PlaybackCommand::PlayAt(single(&args, "at <index>").and_then(index)?),
        "queue" => {
            if args.is_empty() {
                return Err(ConsoleError::Usage("queue <id> [<id>...]"));
            }
            PlaybackCommand::SetQueue(
                args.iter()
                    .map(|arg| track_id(arg))
                    .collect::<Result<_, _>>()?,
            )
        }
        "add" => PlaybackCommand::AddToQueue(single(&args, "add <id>").and_then(track_id)?),
        "remove" | "rm" => {
            PlaybackCommand::RemoveFromQueue(single(&args, "remove <id>").and_then(track_id)?)
        }
        "clear" => PlaybackCommand::ClearQueue,
        "toggle" | "p" | "pause" => PlaybackCommand::TogglePlayPause,
        "next" | "n" => PlaybackCommand::Next,
        "prev" | "previous" | "b" => PlaybackCommand::Previous,
        "seek" => seek(single(&args, "seek <secs> | seek <n>%")?)?,
        "vol" | "volume" => PlaybackCommand::SetVolume(
            single(&args, "vol <0.0-1.0>").and_then(|arg| number(arg, "volume"))?,
        ),
        "loop" => PlaybackCommand::SetLooped(single(&args, "loop on|off").and_then(switch)?),
        "shuffle" => {
            PlaybackCommand::SetShuffled(single(&args, "shuffle on|off").and_then(switch)?)
        }
        "stop" => PlaybackCommand::Stop,
        "status" | "s" => return Ok(Some(ConsoleCommand::Status)),
        "tracks" | "ls" => return Ok(Some(ConsoleCommand::Tracks)),
        "help" | "?" => return Ok(Some(ConsoleCommand::Help)),
        "quit" | "exit" | "q" => return Ok(Some(ConsoleCommand::Quit)),
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    Ok(Some(ConsoleCommand::Playback(command)))
}

fn single<'a>(args: &[&'a str], usage: &'static str) -> Result<&'a str, ConsoleError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(ConsoleError::Usage(usage)),
    }
}

fn track_id(arg: &str) -> Result<TrackId, ConsoleError> {
    arg.parse().map_err(|_| ConsoleError::InvalidArgument {
        what: "track id",
        value: arg.to_string(),
    })
}

fn index(arg: &str) -> Result<usize, ConsoleError> {
    arg.parse().map_err(|_| ConsoleError::InvalidArgument {
        what: "queue index",
        value: arg.to_string(),
    })
}

fn number(arg: &str, what: &'static str) -> Result<f32, ConsoleError> {
    arg.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ConsoleError::InvalidArgument {
            what,
            value: arg.to_string(),
        })
}

fn switch(arg: &str) -> Result<bool, ConsoleError> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ConsoleError::InvalidArgument {
            what: "switch",
            value: arg.to_string(),
        }),
    }
}

fn seek(arg: &str) -> Result<PlaybackCommand, ConsoleError> {
    if let Some(percent) = arg.strip_suffix('%') {
        let percent = number(percent, "percentage")?;
        return Ok(PlaybackCommand::SeekPercent(percent / 100.0));
    }

    let seconds = number(arg, "position")?;
    Duration::try_from_secs_f32(seconds)
        .map(PlaybackCommand::Seek)
        .map_err(|_| ConsoleError::InvalidArgument {
            what: "position",
            value: arg.to_string(),
        })
}

/// `m:ss` for time labels
pub fn format_time(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One line per event; `None` for events not worth printing
pub fn render_event(event: &PlaybackEvent) -> Option<String> {
    let line = match event {
        PlaybackEvent::StateChanged { state } => format!("state: {:?}", state),
        PlaybackEvent::TrackChanged {
            track_id,
            display_name,
            artist_name,
            duration_ms,
            ..
        } => format!(
            "now playing [{}] {} - {} ({})",
            track_id,
            artist_name,
            display_name,
            format_time(*duration_ms)
        ),
        PlaybackEvent::TrackFinished { track_id } => format!("finished [{}]", track_id),
        PlaybackEvent::PositionChanged { .. } => return None,
        PlaybackEvent::VolumeChanged { level } => format!("volume: {:.0}%", level * 100.0),
        PlaybackEvent::QueueChanged {
            length,
            current_index,
        } => match current_index {
            Some(index) => format!("queue: {} tracks, at {}", length, index),
            None => "queue: empty".to_string(),
        },
        PlaybackEvent::LoopChanged { enabled } => {
            format!("loop: {}", if *enabled { "on" } else { "off" })
        }
        PlaybackEvent::ShuffleChanged { enabled } => {
            format!("shuffle: {}", if *enabled { "on" } else { "off" })
        }
        PlaybackEvent::Error { message } => format!("error: {}", message),
    };
    Some(line)
}

/// Multi-line status block for the `status` command
pub fn render_status(snapshot: &PlaybackSnapshot) -> String {
    let mut lines = Vec::new();

    match &snapshot.current_track {
        Some(track) => lines.push(format!(
            "{:?}: {} - {} [{} / {}]",
            snapshot.state,
            track.artist_name,
            track.display_name,
            format_time(snapshot.position_ms),
            format_time(snapshot.duration_ms)
        )),
        None => lines.push(format!("{:?}", snapshot.state)),
    }

    lines.push(format!(
        "volume {:.0}% | loop {} | shuffle {}",
        snapshot.volume * 100.0,
        if snapshot.looped { "on" } else { "off" },
        if snapshot.shuffled { "on" } else { "off" }
    ));

    if snapshot.queue.is_empty() {
        lines.push("queue: empty".to_string());
    } else {
        for (i, track_id) in snapshot.queue.iter().enumerate() {
            let marker = if snapshot.current_index == Some(i) {
                ">"
            } else {
                " "
            };
            lines.push(format!("{} {:>3}. [{}]", marker, i, track_id));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tune_playback::PlaybackState;

    fn parse(line: &str) -> ConsoleCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   \t").unwrap().is_none());
    }

    #[test]
    fn parses_playback_commands() {
        assert!(matches!(
            parse("play 7"),
            ConsoleCommand::Playback(PlaybackCommand::PlayTrack(id)) if id.get() == 7
        ));
        assert!(matches!(
            parse("at 2"),
            ConsoleCommand::Playback(PlaybackCommand::PlayAt(2))
        ));
        assert!(matches!(
            parse("NEXT"),
            ConsoleCommand::Playback(PlaybackCommand::Next)
        ));
        assert!(matches!(
            parse("b"),
            ConsoleCommand::Playback(PlaybackCommand::Previous)
        ));
        assert!(matches!(
            parse("loop on"),
            ConsoleCommand::Playback(PlaybackCommand::SetLooped(true))
        ));
        assert!(matches!(
            parse("shuffle off"),
            ConsoleCommand::Playback(PlaybackCommand::SetShuffled(false))
        ));
    }

    #[test]
    fn parses_queue_with_duplicates() {
        match parse("queue 1 2 1") {
            ConsoleCommand::Playback(PlaybackCommand::SetQueue(tracks)) => {
                let ids: Vec<i64> = tracks.iter().map(|id| id.get()).collect();
                assert_eq!(ids, vec![1, 2, 1]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_seek_forms() {
        assert!(matches!(
            parse("seek 90"),
            ConsoleCommand::Playback(PlaybackCommand::Seek(d)) if d == Duration::from_secs(90)
        ));
        assert!(matches!(
            parse("seek 50%"),
            ConsoleCommand::Playback(PlaybackCommand::SeekPercent(f)) if f == 0.5
        ));
        assert!(parse_line("seek -3").is_err());
    }

    #[test]
    fn seek_past_representable_time_is_rejected() {
        assert!(matches!(
            parse_line("seek 1e20"),
            Err(ConsoleError::InvalidArgument { what: "position", .. })
        ));
        assert!(matches!(
            parse_line("seek 3.4e38"),
            Err(ConsoleError::InvalidArgument { what: "position", .. })
        ));
    }

    #[test]
    fn volume_is_passed_through_unclamped() {
        assert!(matches!(
            parse("vol 1.5"),
            ConsoleCommand::Playback(PlaybackCommand::SetVolume(v)) if v == 1.5
        ));
        assert!(parse_line("vol loud").is_err());
        assert!(parse_line("vol NaN").is_err());
    }

    #[test]
    fn reports_usage_and_bad_arguments() {
        assert_eq!(
            parse_line("play").unwrap_err(),
            ConsoleError::Usage("play <id>")
        );
        assert_eq!(
            parse_line("add x").unwrap_err(),
            ConsoleError::InvalidArgument {
                what: "track id",
                value: "x".to_string()
            }
        );
        assert_eq!(
            parse_line("dance").unwrap_err(),
            ConsoleError::UnknownCommand("dance".to_string())
        );
        assert!(parse_line("loop maybe").is_err());
    }

    #[test]
    fn parses_console_commands() {
        assert!(matches!(parse("status"), ConsoleCommand::Status));
        assert!(matches!(parse("tracks"), ConsoleCommand::Tracks));
        assert!(matches!(parse("help"), ConsoleCommand::Help));
        assert!(matches!(parse("quit"), ConsoleCommand::Quit));
    }

    #[test]
    fn formats_time_labels() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(61_500), "1:01");
        assert_eq!(format_time(3_600_000), "60:00");
    }

    #[test]
    fn position_updates_are_not_printed() {
        let event = PlaybackEvent::PositionChanged {
            position_ms: 1,
            duration_ms: 2,
        };
        assert!(render_event(&event).is_none());

        let event = PlaybackEvent::Error {
            message: "boom".to_string(),
        };
        assert_eq!(render_event(&event).unwrap(), "error: boom");
    }

    #[test]
    fn status_marks_current_entry() {
        let snapshot = PlaybackSnapshot {
            state: PlaybackState::Paused,
            queue: vec![TrackId::new(4), TrackId::new(5)],
            current_index: Some(1),
            current_track_id: None,
            current_track: None,
            position_ms: 0,
            duration_ms: 0,
            volume: 0.5,
            looped: true,
            shuffled: false,
        };

        let status = render_status(&snapshot);
        assert!(status.starts_with("Paused"));
        assert!(status.contains("volume 50% | loop on | shuffle off"));
        assert!(status.contains(">   1. [5]"));
    }
}
