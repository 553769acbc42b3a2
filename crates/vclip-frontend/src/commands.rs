//! Interactive gallery and editor commands.

use std::str::FromStr;

use crate::gallery::{SortMode, ViewMode};

pub const GALLERY_HELP: &str = "commands: sort [score|time] | view grid|list | edit N | download N | help | quit";
pub const EDITOR_HELP: &str =
    "commands: start P | end P | volume V | seek P | play | save | export | back | help";

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryCommand {
    /// Set the sort mode, or toggle it when none is given
    Sort(Option<SortMode>),
    View(ViewMode),
    Edit(usize),
    Download(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    Start(f64),
    End(f64),
    Volume(f64),
    Seek(f64),
    TogglePlay,
    Save,
    Export,
    Back,
    Help,
}

fn parse_position(arg: Option<&str>) -> Result<usize, String> {
    let arg = arg.ok_or("missing clip number")?;
    arg.parse::<usize>()
        .map_err(|_| format!("'{arg}' is not a clip number"))
}

fn parse_value(arg: Option<&str>) -> Result<f64, String> {
    let arg = arg.ok_or("missing value")?;
    arg.trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("'{arg}' is not a number"))
}

impl FromStr for GalleryCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("").to_lowercase();
        let arg = words.next();

        match command.as_str() {
            "sort" => arg.map(str::parse).transpose().map(GalleryCommand::Sort),
            "view" => arg
                .ok_or_else(|| "view needs grid or list".to_string())?
                .parse()
                .map(GalleryCommand::View),
            "edit" | "open" => parse_position(arg).map(GalleryCommand::Edit),
            "download" | "dl" => parse_position(arg).map(GalleryCommand::Download),
            "help" | "?" => Ok(GalleryCommand::Help),
            "quit" | "exit" | "q" => Ok(GalleryCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

impl FromStr for EditorCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("").to_lowercase();
        let arg = words.next();

        match command.as_str() {
            "start" => parse_value(arg).map(EditorCommand::Start),
            "end" => parse_value(arg).map(EditorCommand::End),
            "volume" | "vol" => parse_value(arg).map(EditorCommand::Volume),
            "seek" => parse_value(arg).map(EditorCommand::Seek),
            "play" | "pause" => Ok(EditorCommand::TogglePlay),
            "save" => Ok(EditorCommand::Save),
            "export" => Ok(EditorCommand::Export),
            "back" | "close" | "q" => Ok(EditorCommand::Back),
            "help" | "?" => Ok(EditorCommand::Help),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}
