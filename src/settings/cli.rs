use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "coursehub", about = "Course platform session service")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
