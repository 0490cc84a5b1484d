//! File-to-application resolution.
//!
//! A target path is classified into a mime type ([`detect`]), directories are reduced to
//! their dominant content ([`directory`]), the mime is looked up in the freedesktop
//! association stores ([`associations`]) and the chosen `Exec` line is filled in
//! ([`template`]). [`compose`] strings these together; [`launch`] runs the result.

pub mod associations;
pub mod compose;
pub mod controls;
pub mod desktop_entry;
pub mod detect;
pub mod directory;
pub mod error;
pub mod extensions;
pub mod keyfile;
pub mod launch;
pub mod options;
pub mod player;
pub mod probe;
pub mod template;

/// Mime reported for every directory.
pub const DIRECTORY_MIME: &str = "inode/directory";

/// Mime the content probe reports when it cannot tell.
pub const UNKNOWN_MIME: &str = "application/octet-stream";
