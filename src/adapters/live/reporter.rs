//! Console reporter with an English message catalog and a file log.
//!
//! Templates carry `[@@1@@]`-style positional markers that get replaced
//! by the caller's arguments, so a translated catalog can reorder them
//! freely. Every emitted line is appended to `logs/guildcopy.log` with a
//! timestamp; errors additionally land in `logs/errors.log`. Logging
//! failures never fail the run.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use crate::ports::reporter::{MessageKey, Reporter};
use crate::settings::OutputLevel;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/guildcopy.log";
const ERROR_LOG_FILE: &str = "logs/errors.log";

/// Live reporter writing to stdout and the log files.
pub struct ConsoleReporter {
    level: OutputLevel,
}

impl ConsoleReporter {
    /// Creates a reporter for the given output level and language.
    ///
    /// Only the English catalog ships; any other language falls back to
    /// it rather than failing the run.
    #[must_use]
    pub fn new(level: OutputLevel, language: &str) -> Self {
        if !language.eq_ignore_ascii_case("en") {
            tracing::warn!("no catalog for language `{language}`, falling back to en");
        }
        Self { level }
    }

    fn emit(&self, line: &str) {
        if self.level == OutputLevel::All {
            println!("{line}");
        }
        append_log(Path::new(LOG_FILE), line);
    }
}

impl Reporter for ConsoleReporter {
    fn progress(&self, step: u64, key: MessageKey, args: &[&str]) {
        let line = format!("{step}. {}", substitute(template(key), args));
        self.emit(&line);
    }

    fn detail(&self, step: u64, sub: u64, key: MessageKey, args: &[&str]) {
        let line = format!("{step}.{sub} {}", substitute(template(key), args));
        self.emit(&line);
    }

    fn error(&self, message: &str) {
        append_log(Path::new(LOG_FILE), &format!("Error: {message}"));
        append_log(Path::new(ERROR_LOG_FILE), message);
    }
}

/// Replaces `[@@1@@]`, `[@@2@@]`, ... markers with positional arguments.
fn substitute(template: &str, args: &[&str]) -> String {
    let mut text = template.to_string();
    for (index, arg) in args.iter().enumerate() {
        text = text.replace(&format!("[@@{}@@]", index + 1), arg);
    }
    text
}

/// English templates, one per message identifier.
fn template(key: MessageKey) -> &'static str {
    match key {
        MessageKey::SerializingGeneral => "Serializing general data",
        MessageKey::SerializingRoles => "Serializing role data",
        MessageKey::SerializingCategories => "Serializing category data",
        MessageKey::SerializingTextChannels => "Serializing text channel data",
        MessageKey::SerializingVoiceChannels => "Serializing voice channel data",
        MessageKey::SerializingEmojis => "Serializing emojis",
        MessageKey::SerializingBans => "Serializing ban list",
        MessageKey::SavingSnapshot => "Saving guild data to [@@1@@]",
        MessageKey::SerializationFinished => "Serialization finished and data saved",
        MessageKey::SnapshotLoaded => "Serialized data was found at [@@1@@] and will be used",
        MessageKey::DeletingChannels => "Deleting channels",
        MessageKey::DeletingRoles => "Deleting roles",
        MessageKey::DeletingEmojis => "Deleting emojis",
        MessageKey::LiftingBans => "Lifting existing bans",
        MessageKey::CleanupFinished => "New guild cleanup finished",
        MessageKey::SettingGeneral => "Setting general data",
        MessageKey::CreatingRoles => "Creating roles",
        MessageKey::CreatingCategories => "Creating categories",
        MessageKey::CreatingTextChannels => "Creating text channels",
        MessageKey::CreatingVoiceChannels => "Creating voice channels",
        MessageKey::CreatingEmojis => "Creating emojis",
        MessageKey::CreatingBans => "Replaying ban list",
        MessageKey::CopyFinishedPosted => {
            "Guild copy finished! A completion message was posted, the role `[@@1@@]` can now be deleted"
        }
        MessageKey::CopyFinishedNoChannel => {
            "Guild copy finished! The last thing to do is to delete the role `[@@1@@]`"
        }
        MessageKey::Done => "Done!",
        MessageKey::SerializedRoles => "Serialized [@@1@@] role(s)",
        MessageKey::SerializedCategories => "Serialized [@@1@@] categor(y/ies)",
        MessageKey::SerializedTextChannels => "Serialized [@@1@@] text channel(s)",
        MessageKey::SerializedVoiceChannels => "Serialized [@@1@@] voice channel(s)",
        MessageKey::SerializedEmojis => "Serialized [@@1@@] emoji(s)",
        MessageKey::SerializedBans => "Serialized [@@1@@] ban(s)",
        MessageKey::CreatingRole => "Creating role \"[@@1@@]\"",
        MessageKey::UpdatedEveryoneRole => "Applied permissions to the everyone role",
        MessageKey::CreatingCategory => "Creating category \"[@@1@@]\"",
        MessageKey::CreatingTextChannel => "Creating text channel \"[@@1@@]\"",
        MessageKey::CreatingVoiceChannel => "Creating voice channel \"[@@1@@]\"",
        MessageKey::SettingTopic => "Setting topic of \"[@@1@@]\"",
        MessageKey::SystemChannelSet => "Marked system channel [@@1@@]",
        MessageKey::AfkConfigured => "Configured AFK channel and timeout",
        MessageKey::CreatingEmoji => "Creating emoji \"[@@1@@]\"",
        MessageKey::BanningUser => "Banning user [@@1@@]",
    }
}

/// Appends a timestamped line; failures are logged at debug and
/// swallowed.
fn append_log(path: &Path, line: &str) {
    let timestamp = chrono::Local::now().format("%d.%m.%Y %H:%M:%S");
    let entry = format!("[{timestamp}] {line}\n");
    let result = std::fs::create_dir_all(LOG_DIR).and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()))
    });
    if let Err(err) = result {
        tracing::debug!("could not append to {}: {err}", path.display());
    }
}
