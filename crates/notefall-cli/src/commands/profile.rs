//! Profile command: show or edit local settings.

use anyhow::Result;
use notefall::{Difficulty, Profile};

use crate::cli::ProfileAction;
use crate::paths::DataPaths;

pub fn run(paths: &DataPaths, action: &ProfileAction) -> Result<()> {
    let mut profile = paths.load_profile();
    match action {
        ProfileAction::Show => print!("{}", render(&profile)),
        ProfileAction::SetUsername { name } => {
            profile.set_username(name)?;
            eprintln!("Username set to {}", profile.username().unwrap_or_default());
        }
        ProfileAction::SetSpeed { speed } => {
            let applied = profile.set_note_speed(*speed);
            eprintln!("Note speed set to {:.2}x", applied);
        }
    }
    Ok(())
}

fn render(profile: &Profile) -> String {
    let mut out = format!(
        "Username   {}\nNote speed {:.2}x\n",
        profile.username().unwrap_or("(not set)"),
        profile.note_speed()
    );
    for difficulty in Difficulty::ALL {
        out.push_str(&format!(
            "Best {:<6} {}\n",
            difficulty.expand_name(),
            profile.high_score(difficulty)
        ));
    }
    out.push_str(&format!("Pending    {}\n", profile.pending_scores().len()));
    out
}
