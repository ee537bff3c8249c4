//! Command line front end for the tagpak formats.

pub mod commands;
pub mod render;
