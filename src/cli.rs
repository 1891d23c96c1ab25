use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keitai-organizer", version)]
#[command(about = "Translate, sort and classify a folder of i-appli (.jam/.jar/.sp) bundles", long_about = None)]
pub struct Cli {
    /// Folder holding the .jam/.jar/.sp files (or a previous run's changelog.txt)
    pub folder: PathBuf,
}
