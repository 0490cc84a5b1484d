/// Playback and display options picked from the command line.
///
/// `db` and `factor` hold the captures of the matching control word: index 0 is the
/// whole word (`-6db`), index 1 the value (`-6`). Consumers read index 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOptions {
    pub icon: Option<String>,
    pub caption: Option<String>,
    pub db: Vec<String>,
    pub factor: Vec<String>,
    pub novideo: bool,
    pub nosound: bool,
    pub nosub: bool,
}
