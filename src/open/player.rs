use super::options::PlayOptions;
use super::template::CommandTemplate;

pub const DEFAULT_PLAYER: &str = "mplayer";
pub const DEFAULT_DB: &str = "+0";
pub const DEFAULT_SPEED: &str = "1.0";

/// Injects volume/speed/track flags into command lines of one designated player.
#[derive(Debug, Clone)]
pub struct PlayerTweak {
    player: String,
}

impl Default for PlayerTweak {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}

impl PlayerTweak {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
        }
    }

    pub fn apply(&self, template: CommandTemplate, options: &PlayOptions) -> CommandTemplate {
        if template.program().as_deref() != Some(self.player.as_str()) {
            return template;
        }
        template.with_args_after_program(&player_flags(options))
    }
}

fn player_flags(options: &PlayOptions) -> String {
    // value lists carry the whole control word at 0, so the value sits at 1
    let db = options.db.get(1).map(String::as_str).unwrap_or(DEFAULT_DB);
    let speed = options
        .factor
        .get(1)
        .map(String::as_str)
        .unwrap_or(DEFAULT_SPEED);

    let mut flags = vec![
        "-af".to_string(),
        format!("volume={db}dB,scaletempo"),
        "-speed".to_string(),
        speed.to_string(),
    ];
    if options.novideo {
        flags.push("-novideo".to_string());
    }
    if options.nosound {
        flags.push("-nosound".to_string());
    }
    if options.nosub {
        flags.push("-nosub".to_string());
    }
    flags.join(" ")
}
